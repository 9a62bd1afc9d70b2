//! Yes/no confirmation before destructive actions.

/// Blocking yes/no prompt. `false` is a normal answer, not a failure.
pub trait Confirm {
    fn ask(&mut self, message: &str) -> bool;
}

/// `window.confirm()`. Answers `false` when there is no window.
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn ask(&mut self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
