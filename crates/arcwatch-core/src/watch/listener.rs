//! Filtering raw notify events down to new-file notifications.

use std::path::Path;
use std::path::PathBuf;

use notify::Event;
use notify::EventKind;
use notify::event::CreateKind;
use notify::event::ModifyKind;
use notify::event::RenameMode;

/// Receives the path of every file that appears in the watched tree.
pub trait FileCreatedListener: Send + Sync {
    /// Called once per qualifying path, on the notification thread.
    fn on_file_created(&self, path: &Path);
}

/// Paths in `event` that name a newly created (or renamed-in) file.
///
/// Directory creation never qualifies. For `Create(File)` the path is not
/// checked on disk, so a file that vanished again still reaches the
/// listener; other kinds require the path to exist as a non-directory.
///
/// # Examples
///
/// ```
/// use arcwatch_core::watch::listener::new_file_paths;
/// use notify::Event;
/// use notify::EventKind;
/// use notify::event::CreateKind;
/// use std::path::PathBuf;
///
/// let event = Event::new(EventKind::Create(CreateKind::File))
///     .add_path(PathBuf::from("/dl/ReleaseA/game.zip"));
/// assert_eq!(new_file_paths(&event), vec![PathBuf::from("/dl/ReleaseA/game.zip")]);
///
/// let event = Event::new(EventKind::Create(CreateKind::Folder))
///     .add_path(PathBuf::from("/dl/ReleaseB"));
/// assert!(new_file_paths(&event).is_empty());
/// ```
#[must_use]
pub fn new_file_paths(event: &Event) -> Vec<PathBuf> {
    match event.kind {
        EventKind::Create(CreateKind::File) => event.paths.clone(),
        EventKind::Create(CreateKind::Any | CreateKind::Other) => existing_files(&event.paths),
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Any)) => {
            existing_files(&event.paths)
        }
        // paths = [from, to]
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            existing_files(event.paths.last().map(std::slice::from_ref).unwrap_or_default())
        }
        _ => Vec::new(),
    }
}

/// Forwards every qualifying path of `event` to `listener`.
pub fn route(event: &Event, listener: &dyn FileCreatedListener) {
    let paths = new_file_paths(event);
    if paths.is_empty() {
        tracing::trace!("[watch] ignoring {:?} for {:?}", event.kind, event.paths);
    }
    for path in paths {
        listener.on_file_created(&path);
    }
}

fn existing_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| path.exists() && !path.is_dir())
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use notify::event::DataChange;
    use notify::event::RemoveKind;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<PathBuf>>);

    impl FileCreatedListener for Recorder {
        fn on_file_created(&self, path: &Path) {
            self.0.lock().unwrap().push(path.to_path_buf());
        }
    }

    fn event(kind: EventKind, paths: &[&Path]) -> Event {
        paths
            .iter()
            .fold(Event::new(kind), |event, path| event.add_path(path.to_path_buf()))
    }

    #[test]
    fn test_create_file_qualifies_without_stat() {
        let missing = Path::new("/nonexistent/ReleaseA/game.zip");
        let ev = event(EventKind::Create(CreateKind::File), &[missing]);
        assert_eq!(new_file_paths(&ev), vec![missing.to_path_buf()]);
    }

    #[test]
    fn test_create_any_filters_directories() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("game.zip");
        fs::write(&file, b"x").unwrap();

        let ev = event(EventKind::Create(CreateKind::Any), &[temp.path(), &file]);
        assert_eq!(new_file_paths(&ev), vec![file]);
    }

    #[test]
    fn test_rename_into_tree_qualifies() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("game.zip.part");
        let to = temp.path().join("game.zip");
        fs::write(&to, b"x").unwrap();

        let ev = event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &[&from, &to],
        );
        assert_eq!(new_file_paths(&ev), vec![to.clone()]);

        let ev = event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), &[&to]);
        assert_eq!(new_file_paths(&ev), vec![to]);
    }

    #[test]
    fn test_other_kinds_are_ignored() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("game.zip");
        fs::write(&file, b"x").unwrap();

        for kind in [
            EventKind::Create(CreateKind::Folder),
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            EventKind::Remove(RemoveKind::File),
        ] {
            let ev = event(kind, &[&file]);
            assert!(new_file_paths(&ev).is_empty(), "{:?}", ev.kind);
        }
    }

    #[test]
    fn test_route_calls_listener_per_path() {
        let recorder = Recorder::default();
        let a = Path::new("/dl/A/one.zip");
        let b = Path::new("/dl/A/two.zip");

        route(&event(EventKind::Create(CreateKind::File), &[a, b]), &recorder);

        assert_eq!(*recorder.0.lock().unwrap(), vec![a.to_path_buf(), b.to_path_buf()]);
    }
}
