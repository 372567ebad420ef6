//! Saving the buffer.

use std::path::{Path, PathBuf};

use crate::editor::Editor;
use crate::error::EditorError;
use crate::modes::{EditorMode, PromptAction};

/// Where a name typed at the save prompt points, relative names resolving
/// against `cwd`.
#[must_use]
pub fn resolve_save_path(name: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

impl Editor {
    /// Write the buffer, returning whether it reached the disk.
    ///
    /// An unnamed buffer switches to the file name prompt instead.
    pub(crate) fn save(&mut self, announce: bool) -> bool {
        if self.is_viewing_execution_output() {
            self.status.notify("The execution output cannot be saved");
            return false;
        }
        if !self.document.has_path() {
            self.enter_mode(EditorMode::Prompt(PromptAction::SaveAs));
            return false;
        }

        match self.document.save() {
            Ok(bytes) => {
                if announce {
                    self.status.notify(format!(
                        "Saved {} ({bytes} bytes)",
                        self.document.path().display()
                    ));
                }
                self.first_quit_sent = false;
                true
            }
            Err(err) => {
                log::warn!("saving {} failed: {err}", self.document.path().display());
                self.status.notify(EditorError::from(err).to_string());
                false
            }
        }
    }

    /// Bind an unnamed buffer to `name` and save it.
    pub(crate) fn save_as(&mut self, input: &str) {
        let name = input.trim();
        if name.is_empty() {
            self.status.notify("No file name given");
            return;
        }
        let cwd = match std::env::current_dir() {
            Ok(cwd) => cwd,
            Err(err) => {
                self.status.notify(EditorError::from(err).to_string());
                return;
            }
        };

        let path = resolve_save_path(name, &cwd);
        if path.exists() {
            self.status.notify(format!("{} already exists", path.display()));
            return;
        }
        self.document.set_path(path);
        self.attach_syntax();
        self.save(true);
    }
}
