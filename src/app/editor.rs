//! Per-row category editor.
//!
//! Keystrokes only change local text. The backend sees a value once, when
//! the field is left, and only if it differs from what was committed.

/// Editor state for one article's category field.
///
/// ```text
/// Clean --edit--> Dirty --leave field--> Committing --ok--> Clean(new)
///                   ^                        |
///                   +--------- failed -------+   (local text kept)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryEditor {
    /// Shows the last committed value.
    Clean { committed: String },
    /// Holds unsent local text.
    Dirty { committed: String, local: String },
    /// A request with `pending` is in flight; edits are ignored meanwhile.
    Committing { committed: String, pending: String },
}

impl CategoryEditor {
    /// Start from the article's category (`None` shows as empty).
    pub fn new(category: Option<&str>) -> Self {
        Self::Clean {
            committed: category.unwrap_or_default().to_string(),
        }
    }

    /// Text the field displays.
    pub fn value(&self) -> &str {
        match self {
            Self::Clean { committed } => committed,
            Self::Dirty { local, .. } => local,
            Self::Committing { pending, .. } => pending,
        }
    }

    pub fn committed(&self) -> &str {
        match self {
            Self::Clean { committed }
            | Self::Dirty { committed, .. }
            | Self::Committing { committed, .. } => committed,
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty { .. })
    }

    pub fn is_committing(&self) -> bool {
        matches!(self, Self::Committing { .. })
    }

    fn edit(&mut self, f: impl FnOnce(&mut String)) {
        match self {
            Self::Committing { .. } => {}
            Self::Dirty { local, .. } => f(local),
            Self::Clean { committed } => {
                let mut local = committed.clone();
                f(&mut local);
                *self = Self::Dirty {
                    committed: std::mem::take(committed),
                    local,
                };
            }
        }
    }

    pub fn push(&mut self, c: char) {
        if !c.is_control() {
            self.edit(|text| text.push(c));
        }
    }

    pub fn pop(&mut self) {
        self.edit(|text| {
            text.pop();
        });
    }

    /// Leave the field. Returns the value to send, if any.
    ///
    /// Text equal to the committed value goes back to `Clean` without a
    /// request.
    pub fn begin_commit(&mut self) -> Option<String> {
        let Self::Dirty { committed, local } = self else {
            return None;
        };

        if local == committed {
            *self = Self::Clean {
                committed: std::mem::take(committed),
            };
            return None;
        }

        let pending = std::mem::take(local);
        *self = Self::Committing {
            committed: std::mem::take(committed),
            pending: pending.clone(),
        };
        Some(pending)
    }

    /// The in-flight value was accepted by the backend.
    pub fn commit_succeeded(&mut self) {
        if let Self::Committing { pending, .. } = self {
            *self = Self::Clean {
                committed: std::mem::take(pending),
            };
        }
    }

    /// The request failed: keep the user's text as an unsent edit.
    pub fn commit_failed(&mut self) {
        if let Self::Committing { committed, pending } = self {
            *self = Self::Dirty {
                committed: std::mem::take(committed),
                local: std::mem::take(pending),
            };
        }
    }

    /// A fresh snapshot arrived. Clean editors follow the server; editors
    /// holding local text keep it but learn the new committed value.
    pub fn sync_committed(&mut self, category: Option<&str>) {
        let server = category.unwrap_or_default();
        let (Self::Clean { committed }
        | Self::Dirty { committed, .. }
        | Self::Committing { committed, .. }) = self;
        if committed.as_str() != server {
            *committed = server.to_string();
        }
    }
}
