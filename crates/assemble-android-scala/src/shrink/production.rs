//! Shrinking of production variants

use super::{ConfigFragment, JarSelection, MANIFEST_FILTER};
use crate::variant::ScalaVariant;
use crate::wiring::WiringContext;
use assemble_android::android::tasks::ProGuard;
use assemble_android::task::TaskHandle;
use assemble_android::{Project, ProjectResult};
use log::{debug, info};
use std::fs;

/// The task that produces the shrunk production classes of a variant
#[derive(Debug, Clone)]
pub struct ProductionShrink {
    task: TaskHandle<ProGuard>,
    library: bool,
}

impl ProductionShrink {
    pub fn task(&self) -> &TaskHandle<ProGuard> {
        &self.task
    }

    /// Whether this is the (disabled) proguard task of a library
    pub fn is_library(&self) -> bool {
        self.library
    }
}

/// Configures shrinking of a production variant.
///
/// A library is never shrunk on its own, so its proguard task is disabled and returned as is.
/// An application gets a new `proguard<Variant>Scala` task that shrinks the merged java and
/// scala classes, and its dex task is redirected to the shrunk jar. The dex inputs and libraries
/// are its input jars, and only the boot classpath is passed as library jars.
///
/// Only the configuration files of the variant's proguard task are carried over to the new
/// task. Its other options are not.
pub fn wire(
    project: &mut Project,
    ctx: &WiringContext,
    variant: &ScalaVariant,
) -> ProjectResult<Option<ProductionShrink>> {
    let proguard = match variant.proguard() {
        Some(proguard) => proguard.clone(),
        None => {
            debug!("{} is not minified", variant.name());
            return Ok(None);
        }
    };

    if variant.is_library() {
        proguard.configure_with(|task| {
            task.dont_obfuscate();
            task.dont_optimize();
            task.dont_shrink();
        });
        debug!("disabled shrinking of library variant {}", variant.name());
        return Ok(Some(ProductionShrink {
            task: proguard,
            library: true,
        }));
    }

    let java_compile = variant.java_compile().clone();
    let dex = variant.dex().clone();
    let shrink = project.register_task::<ProGuard>(&variant.scala_proguard_name())?;
    info!("shrinking {} with {}", variant.name(), shrink.id());

    let configuration_files = proguard.with(|task| task.configuration_files().to_vec());
    proguard.configure_with(|task| task.depends_on(java_compile.id()));

    let work_dir = variant.work_dir();
    let fragment = ConfigFragment::injars(
        variant.injars_fragment(),
        java_compile.with(|java| java.destination_dir.clone()),
    );
    let out_jar = variant.proguarded_jar();
    let boot_classpath = ctx.boot_classpath.clone();

    shrink.configure_with(|task| {
        for file in configuration_files {
            task.configuration(file);
        }
        task.configuration(ctx.layout.scala_proguard_config());
        task.depends_on(java_compile.id());

        let dex = dex.clone();
        task.do_first(move |task, _| {
            fs::create_dir_all(&work_dir)?;
            fragment.write()?;
            task.configuration(fragment.path());

            let mut selection = JarSelection::new();
            selection.declared(fragment.declared());
            dex.with(|dex| {
                selection
                    .input(dex.input_files.iter().cloned())
                    .input(dex.libraries.iter().cloned());
            });
            selection.library(boot_classpath.iter().cloned());
            selection.apply_to(task);
            task.outjars(&out_jar, Some(MANIFEST_FILTER));

            dex.configure_with(|dex| dex.redirect_to(&out_jar));
            Ok(())
        });
    });
    dex.configure_with(|task| task.depends_on(shrink.id()));

    Ok(Some(ProductionShrink {
        task: shrink,
        library: false,
    }))
}
