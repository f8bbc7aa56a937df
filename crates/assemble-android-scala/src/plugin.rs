//! Contains the android-scala plugin

use crate::error::ScalaAndroidError;
use crate::extension::{ScalaExtension, SCALA_EXTENSION};
use crate::shrink::production::ProductionShrink;
use crate::shrink::{SCALA_PROGUARD_DEFAULTS, SCALA_TEST_PROGUARD_DEFAULTS};
use crate::variant::ScalaVariant;
use crate::wiring::WiringContext;
use crate::work_dir::WorkDirLayout;
use crate::{compile, shrink, source_sets};
use assemble_android::android::{AndroidExtension, AppPlugin, LibraryPlugin};
use assemble_android::plugins::extensions::ExtensionAware;
use assemble_android::plugins::Plugin;
use assemble_android::{Project, ProjectResult};
use log::{debug, info};
use std::collections::HashMap;
use std::fs;

/// The id of the plugin
pub const PLUGIN_ID: &str = "android-scala";

/// Compiles the scala sources of android projects and makes proguard aware of them.
///
/// Either the android application or the android library plugin must be applied first.
#[derive(Debug, Default)]
pub struct ScalaAndroidPlugin;

impl Plugin for ScalaAndroidPlugin {
    fn apply(&self, project: &mut Project) -> ProjectResult {
        check_android(project)?;

        project
            .extensions_mut()
            .add(SCALA_EXTENSION, ScalaExtension::default())?;
        source_sets::install(project)?;
        install_proguard_defaults(project)?;
        project.after_evaluate(wire_variants);
        Ok(())
    }

    fn plugin_id(&self) -> &str {
        PLUGIN_ID
    }
}

fn check_android(project: &Project) -> Result<(), ScalaAndroidError> {
    let android_applied = [AppPlugin.plugin_id(), LibraryPlugin.plugin_id()]
        .iter()
        .any(|id| project.has_plugin(id));
    let android = match project.extension::<AndroidExtension>() {
        Some(android) if android_applied => android,
        _ => return Err(ScalaAndroidError::AndroidPluginMissing),
    };
    if android.default_config.jack_enabled {
        return Err(ScalaAndroidError::IncompatibleOption("jack"));
    }
    Ok(())
}

/// Writes the default proguard rules into the build directory and adds them to the android
/// default configuration
fn install_proguard_defaults(project: &mut Project) -> ProjectResult {
    let layout = WorkDirLayout::new(project.build_dir());
    fs::create_dir_all(layout.root())?;
    fs::write(layout.scala_proguard_config(), SCALA_PROGUARD_DEFAULTS)?;
    fs::write(layout.test_proguard_config(), SCALA_TEST_PROGUARD_DEFAULTS)?;

    let android = project.require_extension_mut::<AndroidExtension>()?;
    android
        .default_config
        .proguard_file(layout.scala_proguard_config());
    android
        .default_config
        .test_proguard_file(layout.test_proguard_config());
    Ok(())
}

/// Wires every variant once the project is evaluated
fn wire_variants(project: &mut Project) -> ProjectResult {
    source_sets::install(project)?;
    project.require_extension_mut::<ScalaExtension>()?.freeze();

    let ctx = WiringContext::from_project(project)?;
    let variants = project
        .require_extension::<AndroidExtension>()?
        .variants()
        .to_vec();
    info!("wiring scala into {} variants of {}", variants.len(), project);

    let mut production: HashMap<String, ProductionShrink> = HashMap::new();
    for variant in &variants {
        let variant = ScalaVariant::new(variant, &ctx.layout);
        compile::wire(project, &ctx, &variant)?;
    }
    for variant in variants.iter().filter(|v| !v.is_test()) {
        let variant = ScalaVariant::new(variant, &ctx.layout);
        if let Some(production_shrink) = shrink::production::wire(project, &ctx, &variant)? {
            production.insert(variant.name().to_string(), production_shrink);
        }
    }
    for variant in variants.iter().filter(|v| v.is_test()) {
        let variant = ScalaVariant::new(variant, &ctx.layout);
        let tested = variant.tested_variant().map(|tested| tested.name());
        let tested_shrink = tested.and_then(|name| production.get(name));
        shrink::test::wire(project, &ctx, &variant, tested_shrink)?;
    }
    debug!("finished wiring {}", project);
    Ok(())
}
