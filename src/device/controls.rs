//! The device's local command surface beyond drawing: channels, display,
//! clock, tools, buzzer and TF-card playback.

use crate::{
    device::{
        protocol::{
            ChannelIndexResponse, ClockInfoResponse, DeviceSettings, DeviceTime, LocalCommand,
            LocalStatus, WeatherInfo, decode_response,
        },
        session::DeviceSession,
        transport::Transport,
    },
    foundation::{
        core::clamp_percent,
        error::{PixooError, PixooResult},
    },
};

/// Top-level channel shown by the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// Clock faces.
    Faces = 0,
    /// Cloud gallery feeds.
    Cloud = 1,
    /// Audio visualizer.
    Visualizer = 2,
    /// User-defined pages.
    Custom = 3,
    /// Blank screen.
    Black = 4,
}

impl Channel {
    /// Channel for a `SelectIndex` value.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Faces),
            1 => Some(Self::Cloud),
            2 => Some(Self::Visualizer),
            3 => Some(Self::Custom),
            4 => Some(Self::Black),
            _ => None,
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = PixooError;

    fn from_str(s: &str) -> PixooResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "faces" | "clock" => Ok(Self::Faces),
            "cloud" => Ok(Self::Cloud),
            "visualizer" => Ok(Self::Visualizer),
            "custom" => Ok(Self::Custom),
            "black" | "off" => Ok(Self::Black),
            other => Err(PixooError::validation(format!(
                "unknown channel '{other}' (faces, cloud, visualizer, custom, black)"
            ))),
        }
    }
}

/// Sub-feed of the cloud channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CloudChannel {
    /// Curated gallery.
    Recommended = 0,
    /// Liked images.
    Favourite = 1,
    /// Followed artists.
    Subscribed = 2,
    /// Album feed.
    Album = 3,
}

/// Screen rotation applied by the firmware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Rotation {
    /// Upright.
    #[default]
    Normal = 0,
    /// Quarter turn.
    Deg90 = 1,
    /// Upside down.
    Deg180 = 2,
    /// Three quarter turns.
    Deg270 = 3,
}

/// Unit for the weather and clock displays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    #[default]
    Celsius = 0,
    /// Degrees Fahrenheit.
    Fahrenheit = 1,
}

/// `Tools/SetStopWatch` status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum StopwatchAction {
    /// Pause.
    Stop = 0,
    /// Run.
    Start = 1,
    /// Back to zero.
    Reset = 2,
}

/// What `Device/PlayTFGif` should play from the SD card or the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TfGif {
    /// One file on the card.
    File(String),
    /// Every GIF in a card folder.
    Folder(String),
    /// A GIF fetched by the device itself.
    Url(String),
}

impl TfGif {
    fn file_type(&self) -> u8 {
        match self {
            Self::File(_) => 0,
            Self::Folder(_) => 1,
            Self::Url(_) => 2,
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::File(s) | Self::Folder(s) | Self::Url(s) => s,
        }
    }
}

const MAX_SCORE: i64 = 999;
const CUSTOM_PAGES: u8 = 3;

impl<T: Transport> DeviceSession<T> {
    /// Switch the top-level channel.
    pub fn select_channel(&mut self, channel: Channel) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Channel/SetIndex").param("SelectIndex", channel as u8))
    }

    /// Read the active channel.
    pub fn current_channel(&mut self) -> PixooResult<ChannelIndexResponse> {
        let cmd = LocalCommand::new("Channel/GetIndex");
        let body = self.local(&cmd)?;
        decode_response(cmd.name(), &body)
    }

    /// Select a clock face by id, see [`Self::dial_list`].
    pub fn select_clock_face(&mut self, clock_id: i64) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Channel/SetClockSelectId").param("ClockId", clock_id))
    }

    /// Read the selected clock face.
    pub fn clock_face_info(&mut self) -> PixooResult<ClockInfoResponse> {
        let cmd = LocalCommand::new("Channel/GetClockInfo");
        let body = self.local(&cmd)?;
        decode_response(cmd.name(), &body)
    }

    /// Custom pages are numbered `0..3`.
    pub fn select_custom_page(&mut self, page: u8) -> PixooResult<LocalStatus> {
        if page >= CUSTOM_PAGES {
            return Err(PixooError::validation(format!(
                "custom page must be below {CUSTOM_PAGES}, got {page}"
            )));
        }
        self.local_status(&LocalCommand::new("Channel/SetCustomPageIndex").param("CustomPageIndex", page))
    }

    /// Switch to the visualizer channel at style `eq_position`.
    pub fn select_visualizer(&mut self, eq_position: u32) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Channel/SetEqPosition").param("EqPosition", eq_position))
    }

    /// Pick the cloud sub-feed.
    pub fn select_cloud_channel(&mut self, channel: CloudChannel) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Channel/CloudIndex").param("Index", channel as u8))
    }

    /// Values outside `0..=100` are clamped.
    pub fn set_brightness(&mut self, percent: i64) -> PixooResult<LocalStatus> {
        let brightness = clamp_percent(percent);
        self.local_status(&LocalCommand::new("Channel/SetBrightness").param("Brightness", brightness))
    }

    /// Turn the panel on or off. Playback state is kept.
    pub fn set_screen(&mut self, on: bool) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Channel/OnOffScreen").param("OnOff", u8::from(on)))
    }

    /// `set_screen(true)`.
    pub fn screen_on(&mut self) -> PixooResult<LocalStatus> {
        self.set_screen(true)
    }

    /// `set_screen(false)`.
    pub fn screen_off(&mut self) -> PixooResult<LocalStatus> {
        self.set_screen(false)
    }

    /// Read every setting and keep them in the session state.
    pub fn settings(&mut self) -> PixooResult<DeviceSettings> {
        let cmd = LocalCommand::new("Channel/GetAllConf");
        let body = self.local(&cmd)?;
        let settings: DeviceSettings = decode_response(cmd.name(), &body)?;
        self.state_mut().set_settings(settings);
        Ok(settings)
    }

    /// Rotate everything the firmware draws.
    pub fn set_rotation(&mut self, rotation: Rotation) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetScreenRotationAngle").param("Mode", rotation as u8))
    }

    /// Mirror the panel left/right.
    pub fn set_mirror_mode(&mut self, on: bool) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetMirrorMode").param("Mode", u8::from(on)))
    }

    /// Toggle the firmware's high-brightness mode.
    pub fn set_high_light_mode(&mut self, on: bool) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetHighLightMode").param("Mode", u8::from(on)))
    }

    /// Per-channel gain, each clamped to `0..=100`.
    pub fn set_white_balance(&mut self, r: i64, g: i64, b: i64) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Device/SetWhiteBalance")
            .param("RValue", clamp_percent(r))
            .param("GValue", clamp_percent(g))
            .param("BValue", clamp_percent(b));
        self.local_status(&cmd)
    }

    /// Location used for the device's weather display.
    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Sys/LogAndLat")
            .param("Longitude", longitude.to_string())
            .param("Latitude", latitude.to_string());
        self.local_status(&cmd)
    }

    /// e.g. `"GMT-5"`.
    pub fn set_time_zone(&mut self, zone: &str) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Sys/TimeZone").param("TimeZoneValue", zone))
    }

    /// Unix seconds.
    pub fn set_system_time(&mut self, utc_seconds: i64) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetUTC").param("Utc", utc_seconds))
    }

    /// Read the device clock.
    pub fn device_time(&mut self) -> PixooResult<DeviceTime> {
        let cmd = LocalCommand::new("Device/GetDeviceTime");
        let body = self.local(&cmd)?;
        decode_response(cmd.name(), &body)
    }

    /// Pick Celsius or Fahrenheit.
    pub fn set_temperature_unit(&mut self, unit: TemperatureUnit) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetDisTempMode").param("Mode", unit as u8))
    }

    /// Toggle the 24-hour clock.
    pub fn set_24_hour(&mut self, on: bool) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Device/SetTime24Flag").param("Mode", u8::from(on)))
    }

    /// Read the weather the device last synced.
    pub fn weather(&mut self) -> PixooResult<WeatherInfo> {
        let cmd = LocalCommand::new("Device/GetWeatherInfo");
        let body = self.local(&cmd)?;
        decode_response(cmd.name(), &body)
    }

    /// Set and start or stop the countdown tool.
    pub fn set_countdown(&mut self, minutes: u32, seconds: u32, running: bool) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Tools/SetTimer")
            .param("Minute", minutes)
            .param("Second", seconds)
            .param("Status", u8::from(running));
        self.local_status(&cmd)
    }

    /// Drive the stopwatch tool.
    pub fn stopwatch(&mut self, action: StopwatchAction) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Tools/SetStopWatch").param("Status", action as u8))
    }

    /// Scores are clamped to `0..=999`.
    pub fn set_scoreboard(&mut self, blue: i64, red: i64) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Tools/SetScoreBoard")
            .param("BlueScore", blue.clamp(0, MAX_SCORE))
            .param("RedScore", red.clamp(0, MAX_SCORE));
        self.local_status(&cmd)
    }

    /// Start or stop the noise meter tool.
    pub fn set_noise_meter(&mut self, running: bool) -> PixooResult<LocalStatus> {
        self.local_status(&LocalCommand::new("Tools/SetNoiseStatus").param("NoiseStatus", u8::from(running)))
    }

    /// Buzz in cycles of `on_ms` on / `off_ms` off for `total_ms`.
    pub fn play_buzzer(&mut self, on_ms: u32, off_ms: u32, total_ms: u32) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Device/PlayBuzzer")
            .param("ActiveTimeInCycle", on_ms)
            .param("OffTimeInCycle", off_ms)
            .param("PlayTotalTime", total_ms);
        self.local_status(&cmd)
    }

    /// Play GIFs from the SD card or a URL.
    pub fn play_tf_gif(&mut self, gif: &TfGif) -> PixooResult<LocalStatus> {
        let cmd = LocalCommand::new("Device/PlayTFGif")
            .param("FileType", gif.file_type())
            .param("FileName", gif.name());
        self.local_status(&cmd)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/device/controls.rs"]
mod tests;
