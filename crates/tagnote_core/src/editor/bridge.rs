//! Bridge between an editable document surface and a string-valued field.
//!
//! # Responsibility
//! - Push the authoritative value into the surface only when it differs
//!   from the live content, so cursor and composition state survive
//!   re-renders.
//! - Forward user edits as change events.
//! - Issue formatting commands and plain-text paste against the surface.
//!
//! # Invariants
//! - `set_value` with the current live content never writes the surface.
//! - Read-only mode issues no command and fires no change event.
//! - A cancelled or empty link prompt issues no command.

use crate::model::note::strip_markup;

/// Formatting operation applied to the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    UnorderedList,
    OrderedList,
    /// Turns the current block into a level-3 heading.
    Heading,
    /// Turns the current block back into a paragraph.
    Paragraph,
    CreateLink(String),
}

impl FormatCommand {
    /// Document command name understood by editable surfaces.
    pub fn command_name(&self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::UnorderedList => "insertUnorderedList",
            Self::OrderedList => "insertOrderedList",
            Self::Heading | Self::Paragraph => "formatBlock",
            Self::CreateLink(_) => "createLink",
        }
    }

    pub fn argument(&self) -> Option<&str> {
        match self {
            Self::Heading => Some("<h3>"),
            Self::Paragraph => Some("<p>"),
            Self::CreateLink(url) => Some(url.as_str()),
            _ => None,
        }
    }
}

/// Externally owned editable document.
///
/// Implemented by the real rendering surface; tests use an in-memory one.
pub trait EditableSurface {
    /// Returns the live serialized content.
    fn html(&self) -> String;
    /// Replaces the live content. Resets cursor and selection.
    fn set_html(&mut self, html: &str);
    fn set_editable(&mut self, editable: bool);
    /// Applies a formatting command to the current selection.
    fn exec(&mut self, command: &FormatCommand);
    /// Inserts unformatted text at the cursor.
    fn insert_text(&mut self, text: &str);
}

/// Clipboard payload offered by a paste gesture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub plain_text: Option<String>,
    pub html: Option<String>,
}

impl ClipboardData {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            plain_text: Some(text.into()),
            html: None,
        }
    }

    /// Returns the text to insert, never markup.
    pub fn as_plain_text(&self) -> String {
        match (&self.plain_text, &self.html) {
            (Some(text), _) => text.clone(),
            (None, Some(html)) => strip_markup(html),
            (None, None) => String::new(),
        }
    }
}

/// Controlled wrapper around an `EditableSurface`.
pub struct RichTextBridge<S, F>
where
    S: EditableSurface,
    F: FnMut(String),
{
    surface: S,
    read_only: bool,
    on_change: F,
}

impl<S, F> RichTextBridge<S, F>
where
    S: EditableSurface,
    F: FnMut(String),
{
    /// Mounts the bridge and seeds the surface from `value`.
    pub fn new(mut surface: S, value: &str, read_only: bool, on_change: F) -> Self {
        surface.set_editable(!read_only);
        let mut bridge = Self {
            surface,
            read_only,
            on_change,
        };
        bridge.set_value(value);
        bridge
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Receives a new authoritative value.
    ///
    /// Returns `true` when the surface had to be rewritten.
    pub fn set_value(&mut self, value: &str) -> bool {
        if self.surface.html() == value {
            return false;
        }
        self.surface.set_html(value);
        true
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        if self.read_only != read_only {
            self.read_only = read_only;
            self.surface.set_editable(!read_only);
        }
    }

    /// Handles an input event raised by the surface.
    ///
    /// Read-only surfaces never report changes; returns `false` for them.
    pub fn handle_input(&mut self) -> bool {
        if self.read_only {
            return false;
        }
        let html = self.surface.html();
        (self.on_change)(html);
        true
    }

    /// Applies a toolbar command. Returns `false` in read-only mode.
    pub fn apply(&mut self, command: FormatCommand) -> bool {
        if self.read_only {
            return false;
        }
        self.surface.exec(&command);
        self.handle_input()
    }

    /// Asks for a URL and links the current selection to it.
    pub fn insert_link(&mut self, prompt: impl FnOnce() -> Option<String>) -> bool {
        if self.read_only {
            return false;
        }
        match prompt() {
            Some(url) if !url.is_empty() => self.apply(FormatCommand::CreateLink(url)),
            _ => false,
        }
    }

    /// Inserts clipboard content as plain text, discarding source formatting.
    pub fn paste(&mut self, clipboard: &ClipboardData) -> bool {
        if self.read_only {
            return false;
        }
        let text = clipboard.as_plain_text();
        if text.is_empty() {
            return false;
        }
        self.surface.insert_text(&text);
        self.handle_input()
    }
}
