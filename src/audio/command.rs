//! Commands sent from the main thread to the audio thread via ring buffer.

use super::periodic_wave::PeriodicWave;

/// Identifies an oscillator node across the thread boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OscillatorId(pub u64);

/// Commands sent from the main thread to the audio thread via ring buffer.
#[derive(Debug)]
pub enum AudioCommand {
    /// Add a new, unconnected and unstarted oscillator.
    CreateOscillator { id: OscillatorId, wave: PeriodicWave },

    /// Route an oscillator into the gain stage.
    Connect(OscillatorId),

    /// Begin generation.
    Start(OscillatorId),

    /// Halt generation. The oscillator cannot be restarted.
    Stop(OscillatorId),

    /// Remove the oscillator from the graph.
    Disconnect(OscillatorId),

    /// Set the gain stage (0.0 to 1.0).
    SetGain(f32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::periodic_wave::PeriodicWaveOptions;
    use ringbuf::{
        traits::{Consumer, Producer, Split},
        HeapRb,
    };

    #[test]
    fn test_command_send_receive_gain() {
        let rb = HeapRb::<AudioCommand>::new(16);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(AudioCommand::SetGain(0.75)).unwrap();

        let cmd = cons.try_pop().unwrap();
        match cmd {
            AudioCommand::SetGain(v) => assert!((v - 0.75).abs() < f32::EPSILON),
            _ => panic!("expected SetGain command"),
        }
    }

    #[test]
    fn test_command_carries_wave() {
        let rb = HeapRb::<AudioCommand>::new(16);
        let (mut prod, mut cons) = rb.split();

        let wave = PeriodicWave::new(&[0.0; 4], &[0.0, 1.0, 0.0, 0.0], PeriodicWaveOptions::default());
        prod.try_push(AudioCommand::CreateOscillator {
            id: OscillatorId(3),
            wave: wave.clone(),
        })
        .unwrap();

        match cons.try_pop().unwrap() {
            AudioCommand::CreateOscillator { id, wave: received } => {
                assert_eq!(id, OscillatorId(3));
                assert_eq!(received, wave);
            }
            _ => panic!("expected CreateOscillator command"),
        }
    }

    #[test]
    fn test_command_ordering_preserved() {
        let rb = HeapRb::<AudioCommand>::new(16);
        let (mut prod, mut cons) = rb.split();

        prod.try_push(AudioCommand::Connect(OscillatorId(1))).unwrap();
        prod.try_push(AudioCommand::Start(OscillatorId(1))).unwrap();
        prod.try_push(AudioCommand::Stop(OscillatorId(1))).unwrap();

        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::Connect(_)));
        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::Start(_)));
        assert!(matches!(cons.try_pop().unwrap(), AudioCommand::Stop(_)));
        assert!(cons.try_pop().is_none());
    }
}
