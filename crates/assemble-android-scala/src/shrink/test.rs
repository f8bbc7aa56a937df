//! Shrinking of test variants

use super::cleanup::{strip_test_classes, BestEffort};
use super::production::ProductionShrink;
use super::{ConfigFragment, JarSelection, MANIFEST_FILTER};
use crate::variant::ScalaVariant;
use crate::wiring::WiringContext;
use assemble_android::android::tasks::ProGuard;
use assemble_android::task::TaskHandle;
use assemble_android::{Project, ProjectResult};
use log::{debug, info};
use std::fs;

/// Configures shrinking of a test variant, if its tested variant is shrunk.
///
/// The new `proguard<Variant>Scala` task shrinks the test classes. When an application is
/// tested, the shrunk production classes are library jars and both the test package and the
/// tested package are kept entirely. When a library is tested, nothing is shrunk, matching the
/// library itself. Once the task is done, every test class is removed from the outputs of the
/// production shrink task.
///
/// The test dex inputs and libraries are input jars too, since the test dex task is redirected
/// to the shrunk jar and drops its own library list.
pub fn wire(
    project: &mut Project,
    ctx: &WiringContext,
    variant: &ScalaVariant,
    production: Option<&ProductionShrink>,
) -> ProjectResult<Option<TaskHandle<ProGuard>>> {
    let tested = match variant.tested() {
        Some(tested) => tested,
        None => return Ok(None),
    };
    let production = match (tested.proguard(), production) {
        (Some(_), Some(production)) => production.task().clone(),
        _ => {
            debug!("{} is not minified, not shrinking {}", tested.name(), variant.name());
            return Ok(None);
        }
    };
    let library_tested = tested.is_library();

    let test_compile = variant.java_compile().clone();
    let tested_compile = tested.java_compile().clone();
    let test_dex = variant.dex().clone();
    let shrink = project.register_task::<ProGuard>(&variant.scala_proguard_name())?;
    info!("shrinking {} with {}", variant.name(), shrink.id());

    let configuration_files = production.with(|task| task.configuration_files().to_vec());
    let test_classes = test_compile.with(|java| java.destination_dir.clone());
    let work_dir = variant.work_dir();
    let fragment = ConfigFragment::injars(variant.injars_fragment(), &test_classes);
    let out_jar = variant.proguarded_jar();
    let boot_classpath = ctx.boot_classpath.clone();

    shrink.configure_with(|task| {
        task.depends_on(test_compile.id());
        task.depends_on(production.id());
        task.print_configuration(tested.test_configuration_dump());
        for file in configuration_files {
            task.configuration(file);
        }
        if library_tested {
            task.dont_shrink();
            task.dont_obfuscate();
            task.dont_optimize();
        } else {
            task.configuration(ctx.layout.test_proguard_config());
            task.keep(format!("class {}.** {{ *; }}", variant.package()));
            task.keep(format!("class {}.** {{ *; }}", tested.package()));
        }

        let test_dex = test_dex.clone();
        let shrunk = production.clone();
        task.do_first(move |task, _| {
            fs::create_dir_all(&work_dir)?;
            fragment.write()?;
            task.configuration(fragment.path());

            let mut selection = JarSelection::new();
            selection.declared(fragment.declared());
            test_dex.with(|dex| {
                selection
                    .input(dex.input_files.iter().cloned())
                    .input(dex.libraries.iter().cloned());
            });
            selection.library(boot_classpath.iter().cloned());
            test_compile.with(|java| {
                selection.library(java.classpath.iter().cloned());
            });
            if library_tested {
                tested_compile.with(|java| {
                    selection.input(java.classpath.iter().cloned());
                });
            } else {
                selection.force_library(shrunk.with(|p| p.out_jar_files()));
            }
            selection.apply_to(task);
            task.outjars(&out_jar, Some(MANIFEST_FILTER));

            test_dex.configure_with(|dex| dex.redirect_to(&out_jar));
            Ok(())
        });

        let archives = ctx.archives.clone();
        task.do_last(move |_, _| {
            let outputs = production.with(|p| p.out_jar_files());
            let mut policy = BestEffort::new();
            let report = strip_test_classes(&test_classes, &outputs, archives.as_ref(), &mut policy);
            debug!(
                "removed {} test classes from the production artifact, {} warnings",
                report.removed,
                policy.warnings().len()
            );
            Ok(())
        });
    });
    test_dex.configure_with(|task| task.depends_on(shrink.id()));

    Ok(Some(shrink))
}
