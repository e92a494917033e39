use crate::error::NotifyError;

/// Speech sink. Announcements are fire-and-forget: the controller logs
/// failures and carries on.
pub trait Notifier {
    /// Whether the platform can speak at all.
    fn is_available(&self) -> bool;

    fn speak(&mut self, text: &str, language: &str) -> Result<(), NotifyError>;

    /// Cuts off whatever is currently being spoken.
    fn stop(&mut self);
}

/// Stand-in for platforms without speech.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn is_available(&self) -> bool { false }

    fn speak(&mut self, _text: &str, _language: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }

    fn stop(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub text: String,
    pub language: String,
}

/// Keeps every announcement in order; useful for headless hosts and tests.
/// Languages listed in `voiceless` fail with `NoVoice`.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    pub spoken: Vec<Announcement>,
    pub stops: usize,
    pub voiceless: Vec<String>,
}

impl Notifier for RecordingNotifier {
    fn is_available(&self) -> bool { true }

    fn speak(&mut self, text: &str, language: &str) -> Result<(), NotifyError> {
        if self.voiceless.iter().any(|l| l == language) {
            return Err(NotifyError::NoVoice { language: language.to_string() });
        }
        self.spoken.push(Announcement { text: text.to_string(), language: language.to_string() });
        Ok(())
    }

    fn stop(&mut self) {
        self.stops += 1;
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn is_available(&self) -> bool { (**self).is_available() }

    fn speak(&mut self, text: &str, language: &str) -> Result<(), NotifyError> {
        (**self).speak(text, language)
    }

    fn stop(&mut self) { (**self).stop() }
}
