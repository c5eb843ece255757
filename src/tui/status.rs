//! Status bar — playback state, wave, gain and audio device.

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub is_playing: bool,
    pub wave: String,
    pub gain: f32,
    pub device_name: String,
    pub audio_live: bool,
    /// Last formula error, cleared by the next accepted edit.
    pub formula_error: Option<String>,
}

impl StatusInfo {
    /// Format the playback indicator.
    pub fn playback_display(&self) -> &str {
        if self.is_playing {
            "PLAY"
        } else {
            "STOP"
        }
    }

    pub fn gain_display(&self) -> String {
        format!("{:.0}%", self.gain * 100.0)
    }

    /// Device name, shortened to fit the bar, or `NO AUDIO`.
    pub fn device_display(&self) -> String {
        if !self.audio_live {
            return "NO AUDIO".to_string();
        }
        if self.device_name.chars().count() > 12 {
            let mut t: String = self.device_name.chars().take(11).collect();
            t.push('\u{2026}');
            t
        } else {
            self.device_name.clone()
        }
    }
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            is_playing: false,
            wave: "custom".to_string(),
            gain: 0.5,
            device_name: String::new(),
            audio_live: false,
            formula_error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_display() {
        let playing = StatusInfo {
            is_playing: true,
            ..Default::default()
        };
        assert_eq!(playing.playback_display(), "PLAY");
        assert_eq!(StatusInfo::default().playback_display(), "STOP");
    }

    #[test]
    fn gain_display_rounds() {
        let status = StatusInfo {
            gain: 0.456,
            ..Default::default()
        };
        assert_eq!(status.gain_display(), "46%");
    }

    #[test]
    fn offline_shows_no_audio() {
        let status = StatusInfo {
            device_name: "offline".into(),
            audio_live: false,
            ..Default::default()
        };
        assert_eq!(status.device_display(), "NO AUDIO");
    }

    #[test]
    fn long_device_name_is_truncated() {
        let status = StatusInfo {
            device_name: "Built-in Output Speakers".into(),
            audio_live: true,
            ..Default::default()
        };
        assert_eq!(status.device_display(), "Built-in Ou\u{2026}");
    }
}
