//! Precondition tests for the experiment contexts.

#[cfg(test)]
mod tests {
    use mockall::predicate::function;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    use crate::config::ExperimentConfig;
    use crate::confirm::MockConfirm;
    use crate::context::{PersistentExperimentContext, TemporaryExperimentContext, TEMPORARY_WARNING};
    use crate::core::{ContextState, ExperimentKind};
    use crate::errors::ExperimentError;
    use crate::logging::ConsoleTarget;
    use crate::vcs::{MockSourceTree, TreeStatus};

    fn config(dir: &std::path::Path) -> ExperimentConfig {
        ExperimentConfig::new()
            .with_source_root(dir.join("project"))
            .with_experiments_root(dir.join("experiments"))
            .with_temporary_root(dir.join("scratch"))
    }

    fn clean_tree(root: PathBuf) -> MockSourceTree {
        let mut tree = MockSourceTree::new();
        tree.expect_root().return_const(root);
        tree.expect_status().returning(|| Ok(TreeStatus::clean()));
        tree.expect_head_commit()
            .returning(|| Ok(Some("4b825dc642cb6eb9a060e54bf8d69288fbee4904".to_string())));
        tree
    }

    fn persistent(
        dir: &std::path::Path,
        tree: MockSourceTree,
        confirm: MockConfirm,
    ) -> PersistentExperimentContext {
        PersistentExperimentContext::new(config(dir))
            .with_source_tree(tree)
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Discard)
    }

    #[test]
    fn test_dirty_tree_fails_before_any_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = MockSourceTree::new();
        tree.expect_root().return_const(dir.path().join("project"));
        tree.expect_status()
            .times(1)
            .returning(|| Ok(TreeStatus::with_changes(vec![" M train.py".to_string()])));
        tree.expect_head_commit().never();
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let context = persistent(dir.path(), tree, confirm);
        let err = context.enter("baseline", &serde_json::json!({"lr": 0.1})).unwrap_err();

        match err {
            ExperimentError::DirtyRepository(dirty) => {
                assert_eq!(dirty.changes, vec![" M train.py"]);
                assert_eq!(dirty.root, dir.path().join("project"));
            }
            other => panic!("expected DirtyRepository, got {other:?}"),
        }
        assert!(!dir.path().join("experiments").exists());
    }

    #[test]
    fn test_empty_name_rejected_before_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = MockSourceTree::new();
        tree.expect_status().never();
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let context = persistent(dir.path(), tree, confirm);
        let err = context.enter("", &serde_json::Map::new()).unwrap_err();
        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
    }

    #[test]
    fn test_empty_name_rejected_for_temporary() {
        let dir = tempfile::tempdir().unwrap();
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let context = TemporaryExperimentContext::new(config(dir.path()))
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Discard);
        let err = context.enter("", &serde_json::Map::new()).unwrap_err();

        assert!(matches!(err, ExperimentError::InvalidArgument(_)));
        assert!(!dir.path().join("scratch").exists());
    }

    #[test]
    fn test_path_like_names_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["..", "a/b", "."] {
            let mut tree = MockSourceTree::new();
            tree.expect_status().never();
            let context = persistent(dir.path(), tree, MockConfirm::new());
            let err = context.enter(name, &serde_json::Map::new()).unwrap_err();
            assert!(err.is_precondition(), "{name} should be rejected");
        }
    }

    #[test]
    fn test_fresh_name_does_not_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();

        let context = persistent(dir.path(), clean_tree(dir.path().join("project")), confirm);
        let guard = context.enter("fresh", &serde_json::json!({"seed": 1})).unwrap();

        assert_eq!(guard.state(), ContextState::Active);
        assert_eq!(guard.kind(), ExperimentKind::Persistent);
        assert!(guard.data_dir().is_dir());
        assert!(guard.code_dir().is_dir());
    }

    #[test]
    fn test_existing_data_prompts_once() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("experiments/rerun/data");
        std::fs::create_dir_all(&data).unwrap();

        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .with(function(|prompt: &str| {
                prompt.ends_with("already exists, risk of overwriting existing data! Proceed anyway?")
            }))
            .times(1)
            .returning(|_| Ok(true));

        let context = persistent(dir.path(), clean_tree(dir.path().join("project")), confirm);
        let guard = context.enter("rerun", &serde_json::Map::new()).unwrap();
        assert_eq!(guard.path(), dir.path().join("experiments/rerun"));
    }

    #[test]
    fn test_declined_overwrite_aborts_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("experiments/rerun/data");
        std::fs::create_dir_all(&data).unwrap();

        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).returning(|_| Ok(false));

        let context = persistent(dir.path(), clean_tree(dir.path().join("project")), confirm);
        let err = context.enter("rerun", &serde_json::json!({"lr": 1})).unwrap_err();

        assert!(matches!(err, ExperimentError::Aborted(_)));
        assert!(!data.join("args.json").exists());
        assert!(!dir.path().join("experiments/rerun/code").exists());
    }

    #[test]
    fn test_confirm_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into()));

        let context = TemporaryExperimentContext::new(config(dir.path()))
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Discard);
        let err = context.enter_default().unwrap_err();
        assert!(matches!(err, ExperimentError::Io(_)));
    }

    #[test]
    fn test_temporary_always_prompts_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .with(function(|prompt: &str| prompt == TEMPORARY_WARNING))
            .times(1)
            .returning(|_| Ok(true));

        let context = TemporaryExperimentContext::new(config(dir.path()))
            .with_confirm(confirm)
            .with_console(ConsoleTarget::Discard);
        let guard = context.enter("probe", &serde_json::Map::new()).unwrap();

        assert_eq!(guard.kind(), ExperimentKind::Temporary);
        assert!(guard.path().starts_with(dir.path().join("scratch")));
        let dir_name = guard.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(dir_name.starts_with("experiment-"));
    }

    #[test]
    fn test_non_mapping_args_rejected_after_directories() {
        let dir = tempfile::tempdir().unwrap();
        let context = persistent(dir.path(), clean_tree(dir.path().join("project")), MockConfirm::new());

        let err = context.enter("listy", &vec![1, 2, 3]).unwrap_err();

        assert!(matches!(err, ExperimentError::Serialization(_)));
        assert!(dir.path().join("experiments/listy/data").is_dir());
        assert!(!dir.path().join("experiments/listy/data/args.json").exists());
    }
}
