//! Everything the per variant wiring reads from the project, gathered once at evaluation.

use crate::compile::ScalaCompile;
use crate::extension::ScalaExtension;
use crate::source_sets::ScalaSourceSets;
use crate::work_dir::WorkDirLayout;
use assemble_android::android::archive::{ArchiveEditor, ZipArchives};
use assemble_android::android::AndroidExtension;
use assemble_android::task::runner::Runner;
use assemble_android::{Project, ProjectResult};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct WiringContext {
    pub layout: WorkDirLayout,
    pub boot_classpath: Vec<PathBuf>,
    pub scala_sources: ScalaSourceSets,
    pub additional_parameters: Vec<String>,
    pub compiler: Runner<ScalaCompile>,
    pub archives: Arc<dyn ArchiveEditor>,
}

impl WiringContext {
    pub fn from_project(project: &Project) -> ProjectResult<Self> {
        let android = project.require_extension::<AndroidExtension>()?;
        let scala = project.require_extension::<ScalaExtension>()?;
        Ok(Self {
            layout: WorkDirLayout::new(project.build_dir()),
            boot_classpath: android.boot_classpath.clone(),
            scala_sources: project.require_extension::<ScalaSourceSets>()?.clone(),
            additional_parameters: scala.parameter_list(),
            compiler: scala.compiler().clone(),
            archives: Arc::new(ZipArchives),
        })
    }
}
