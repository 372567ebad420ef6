//! Clipboard backends for yank and paste.
//!
//! The system backend goes through `copypasta-ext`, trying the native
//! clipboard first and then the Wayland and X11 command-line tools. It keeps
//! a built-in copy alongside, so pasting still works when the provider fails.

use copypasta_ext::copypasta::{ClipboardContext, ClipboardProvider};
use copypasta_ext::wayland_bin::WaylandBinClipboardContext;
use copypasta_ext::x11_bin::X11BinClipboardContext;
use iedit_document::Text;

/// Where yanked text is kept.
#[cfg_attr(test, mockall::automock)]
pub trait EditorClipboard {
    /// The most recently yanked text.
    fn get_text(&mut self) -> Option<Text>;

    /// Replace the clipboard contents.
    fn set_text(&mut self, text: Text);
}

/// In-process clipboard.
#[derive(Debug, Default)]
pub struct BuiltinClipboard {
    text: Option<Text>,
}

impl EditorClipboard for BuiltinClipboard {
    fn get_text(&mut self) -> Option<Text> {
        self.text.clone()
    }

    fn set_text(&mut self, text: Text) {
        self.text = Some(text);
    }
}

/// Clipboard shared with other applications through `provider`.
pub struct SystemClipboard<P> {
    provider: P,
    fallback: BuiltinClipboard,
}

impl<P: ClipboardProvider> SystemClipboard<P> {
    /// Copy and paste through `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            fallback: BuiltinClipboard::default(),
        }
    }
}

impl<P: ClipboardProvider> EditorClipboard for SystemClipboard<P> {
    fn get_text(&mut self) -> Option<Text> {
        match self.provider.get_contents() {
            Ok(contents) if !contents.is_empty() => Some(text_from_string(contents)),
            Ok(_) => self.fallback.get_text(),
            Err(err) => {
                log::warn!("system paste failed: {err}");
                self.fallback.get_text()
            }
        }
    }

    fn set_text(&mut self, text: Text) {
        if let Err(err) = self.provider.set_contents(text_to_string(&text)) {
            log::warn!("system copy failed: {err}");
        }
        self.fallback.set_text(text);
    }
}

/// The clipboard to use for this session.
///
/// Tries the native clipboard, then `wl-copy`/`wl-paste`, then `xclip` or
/// `xsel`, and settles for the built-in clipboard when none is available.
#[must_use]
pub fn for_session(use_system_clipboard: bool) -> Box<dyn EditorClipboard> {
    if !use_system_clipboard {
        return Box::new(BuiltinClipboard::default());
    }
    if let Ok(context) = ClipboardContext::new() {
        log::debug!("using the native clipboard");
        return Box::new(SystemClipboard::new(context));
    }
    if let Ok(context) = WaylandBinClipboardContext::new() {
        log::debug!("using wl-clipboard");
        return Box::new(SystemClipboard::new(context));
    }
    if let Ok(context) = X11BinClipboardContext::new() {
        log::debug!("using the X11 clipboard tools");
        return Box::new(SystemClipboard::new(context));
    }
    log::debug!("no system clipboard available; using the built-in clipboard");
    Box::new(BuiltinClipboard::default())
}

/// Flatten `text` to a string with `\n` line breaks.
#[must_use]
pub fn text_to_string(text: &Text) -> String {
    match text {
        Text::Empty => String::new(),
        Text::Char(ch) => ch.to_string(),
        Text::String(string) => string.clone(),
        Text::InverseString(string) => string.chars().rev().collect(),
        Text::Lines(lines) => lines.join("\n"),
    }
}

/// Split pasted text into the [`Text`] shape the document inserts.
#[must_use]
pub fn text_from_string(contents: String) -> Text {
    if contents.contains('\n') {
        Text::Lines(
            contents
                .split('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned())
                .collect(),
        )
    } else {
        Text::String(contents)
    }
}
