use assemble_android::exception::BuildException;
use assemble_android::project::ProjectError;
use assemble_android::task::{Empty, TaskState};
use assemble_android::Project;
use parking_lot::Mutex;
use std::sync::Arc;

fn recorder() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(vec![]))
}

#[test]
fn actions_run_around_the_task_action() {
    let mut project = Project::temp("actions");
    let events = recorder();
    let task = project.register_task::<Empty>("task").unwrap();
    task.configure_with(|task| {
        for name in ["first1", "first2"] {
            let events = events.clone();
            task.do_first(move |_, _| {
                events.lock().push(name.to_string());
                Ok(())
            });
        }
        for name in ["last1", "last2"] {
            let events = events.clone();
            task.do_last(move |_, _| {
                events.lock().push(name.to_string());
                Ok(())
            });
        }
    });

    project.execute(&["task"]).unwrap();
    assert_eq!(*events.lock(), vec!["first2", "first1", "last1", "last2"]);
    assert_eq!(task.with(|t| t.state()), TaskState::Executed);
}

#[test]
fn stop_task_skips_remaining_actions() {
    let mut project = Project::temp("stop");
    let events = recorder();
    let task = project.register_task::<Empty>("task").unwrap();
    task.configure_with(|task| {
        task.do_first(|_, _| Err(BuildException::StopTask));
        let events = events.clone();
        task.do_last(move |_, _| {
            events.lock().push("last".to_string());
            Ok(())
        });
    });
    project.execute(&["task"]).unwrap();
    assert!(events.lock().is_empty());
}

#[test]
fn disabled_tasks_are_skipped_but_dependencies_run() {
    let mut project = Project::temp("disabled");
    let events = recorder();
    let dependency = project.register_task::<Empty>("dependency").unwrap();
    let disabled = project.register_task::<Empty>("disabled").unwrap();
    {
        let events = events.clone();
        dependency.configure_with(|task| {
            task.do_last(move |_, _| {
                events.lock().push("dependency".to_string());
                Ok(())
            })
        });
    }
    disabled.configure_with(|task| {
        task.depends_on(dependency.id());
        task.set_enabled(false);
    });

    let order = project.execute(&["disabled"]).unwrap();
    assert_eq!(order, vec![dependency.id().clone(), disabled.id().clone()]);
    assert_eq!(*events.lock(), vec!["dependency"]);
    assert_eq!(disabled.with(|t| t.state()), TaskState::Skipped);
}

#[test]
fn cycles_are_rejected() {
    let mut project = Project::temp("cycle");
    let a = project.register_task::<Empty>("a").unwrap();
    let b = project.register_task::<Empty>("b").unwrap();
    a.configure_with(|t| t.depends_on(b.id()));
    b.configure_with(|t| t.depends_on(a.id()));
    let error = project.execute(&["a"]).unwrap_err();
    assert!(matches!(error.kind(), ProjectError::TaskCycle(_)));
}

#[test]
fn unknown_tasks_are_errors() {
    let mut project = Project::temp("unknown");
    let error = project.execute(&["missing"]).unwrap_err();
    assert!(matches!(error.kind(), ProjectError::IdentifierMissing(_)));
}

#[test]
fn tasks_are_typed() {
    let mut project = Project::temp("typed");
    project.register_task::<Empty>("task").unwrap();
    assert!(project.register_task::<Empty>("task").is_err());
    let error = project
        .task::<assemble_android::android::tasks::Dex>("task")
        .unwrap_err();
    assert!(matches!(error.kind(), ProjectError::WrongTaskType(..)));
}
