//! An assemble plugin that adds scala to android projects.
//!
//! Applying [`ScalaAndroidPlugin`] after the android application or library plugin adds a
//! `src/<sourceSet>/scala` directory to every source set. Once the project is evaluated, every
//! variant whose classpath contains the scala library gets a `compile<Variant>Scala` task that
//! runs before javac, and minified variants get proguard tasks that shrink the merged java and
//! scala classes.
//!
//! ```no_run
//! # use assemble_android::Project;
//! # use assemble_android::android::AppPlugin;
//! # use assemble_android::plugins::extensions::ExtensionAware;
//! # use assemble_android_scala::{ScalaAndroidPlugin, ScalaExtension};
//! let mut project = Project::in_dir("app", "app");
//! project.apply_plugin::<AppPlugin>().unwrap();
//! project.apply_plugin::<ScalaAndroidPlugin>().unwrap();
//! project
//!     .extension_mut::<ScalaExtension>()
//!     .unwrap()
//!     .set_additional_parameters("-feature -deprecation")
//!     .unwrap();
//! project.execute(&["dexDebug"]).unwrap();
//! ```

pub mod compile;
pub mod error;
pub mod extension;
pub mod plugin;
pub mod probe;
pub mod shrink;
pub mod source_sets;
pub mod variant;
pub mod wiring;
pub mod work_dir;

pub use error::ScalaAndroidError;
pub use extension::ScalaExtension;
pub use plugin::{ScalaAndroidPlugin, PLUGIN_ID};
