use std::cell::RefCell;
use std::rc::Rc;

/// A playable sound shared by several owners.
pub trait SoundCue {
    /// Starts (or restarts) playback.
    fn play(&mut self);

    fn stop(&mut self);

    fn is_playing(&self) -> bool;
}

pub type SharedCue = Rc<RefCell<dyn SoundCue>>;

pub fn shared<C: SoundCue + 'static>(cue: C) -> SharedCue {
    Rc::new(RefCell::new(cue))
}

/// Cue without an output device. Tracks playing state like a looping clip
/// would, so thruster logic behaves the same with or without audio.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SilentCue {
    playing: bool,
    plays: u32,
    stops: u32,
}

impl SilentCue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plays(&self) -> u32 {
        self.plays
    }

    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl SoundCue for SilentCue {
    fn play(&mut self) {
        self.playing = true;
        self.plays += 1;
    }

    fn stop(&mut self) {
        self.playing = false;
        self.stops += 1;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

#[cfg(feature = "audio")]
pub use self::device::RodioCue;

#[cfg(feature = "audio")]
mod device {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

    use super::SoundCue;
    use crate::error::{EngineError, Result};

    /// Looping clip on the default output device.
    pub struct RodioCue {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        clip: Arc<[u8]>,
        sink: Option<Sink>,
    }

    impl RodioCue {
        /// Opens the default device. The clip is decoded when played, but is
        /// checked once here so a bad file fails early.
        pub fn open(clip: Vec<u8>) -> Result<Self> {
            let clip: Arc<[u8]> = clip.into();
            Decoder::new(Cursor::new(Arc::clone(&clip)))
                .map_err(|err| EngineError::Audio(err.to_string()))?;
            let (stream, handle) =
                OutputStream::try_default().map_err(|err| EngineError::Audio(err.to_string()))?;
            Ok(Self {
                _stream: stream,
                handle,
                clip,
                sink: None,
            })
        }

        fn start(&mut self) -> Result<()> {
            let source = Decoder::new(Cursor::new(Arc::clone(&self.clip)))
                .map_err(|err| EngineError::Audio(err.to_string()))?;
            let sink = Sink::try_new(&self.handle).map_err(|err| EngineError::Audio(err.to_string()))?;
            sink.append(source.repeat_infinite());
            self.sink = Some(sink);
            Ok(())
        }
    }

    impl SoundCue for RodioCue {
        fn play(&mut self) {
            self.stop();
            if let Err(err) = self.start() {
                log::warn!("thruster sound failed to start: {err}");
            }
        }

        fn stop(&mut self) {
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }
        }

        fn is_playing(&self) -> bool {
            self.sink.as_ref().is_some_and(|sink| !sink.empty())
        }
    }
}
