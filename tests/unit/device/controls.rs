use serde_json::{Value, json};

use super::*;
use crate::{device::mock::ScriptedTransport, foundation::core::MatrixSize};

fn session(transport: ScriptedTransport) -> DeviceSession<ScriptedTransport> {
    DeviceSession::with_transport("10.0.0.9", MatrixSize::S64, transport)
}

fn last_body(s: &DeviceSession<ScriptedTransport>) -> Value {
    s.transport().posts.last().unwrap().1.clone()
}

#[test]
fn brightness_is_clamped() {
    let mut s = session(ScriptedTransport::new());
    s.set_brightness(140).unwrap();
    assert_eq!(last_body(&s), json!({"Command": "Channel/SetBrightness", "Brightness": 100}));
    s.set_brightness(-3).unwrap();
    assert_eq!(last_body(&s)["Brightness"], json!(0));
}

#[test]
fn channel_selection_uses_the_numeric_index() {
    let mut s = session(ScriptedTransport::new());
    s.select_channel(Channel::Visualizer).unwrap();
    assert_eq!(last_body(&s), json!({"Command": "Channel/SetIndex", "SelectIndex": 2}));
    s.select_cloud_channel(CloudChannel::Album).unwrap();
    assert_eq!(last_body(&s), json!({"Command": "Channel/CloudIndex", "Index": 3}));
}

#[test]
fn channel_names_parse() {
    assert_eq!("Cloud".parse::<Channel>().unwrap(), Channel::Cloud);
    assert_eq!("off".parse::<Channel>().unwrap(), Channel::Black);
    assert!("radio".parse::<Channel>().is_err());
    assert_eq!(Channel::from_index(3), Some(Channel::Custom));
    assert_eq!(Channel::from_index(5), None);
}

#[test]
fn current_channel_is_decoded() {
    let transport = ScriptedTransport::new().reply("Channel/GetIndex", json!({"error_code": 0, "SelectIndex": 1}));
    let mut s = session(transport);
    assert_eq!(s.current_channel().unwrap().select_index, 1);
}

#[test]
fn custom_page_out_of_range_is_rejected() {
    let mut s = session(ScriptedTransport::new());
    assert!(s.select_custom_page(2).is_ok());
    assert!(matches!(s.select_custom_page(3), Err(PixooError::Validation(_))));
    assert_eq!(s.transport().posts.len(), 1);
}

#[test]
fn screen_toggle() {
    let mut s = session(ScriptedTransport::new());
    s.screen_off().unwrap();
    assert_eq!(last_body(&s), json!({"Command": "Channel/OnOffScreen", "OnOff": 0}));
    s.screen_on().unwrap();
    assert_eq!(last_body(&s)["OnOff"], json!(1));
}

#[test]
fn settings_are_kept_in_state() {
    let transport = ScriptedTransport::new().reply(
        "Channel/GetAllConf",
        json!({"error_code": 0, "Brightness": 55, "GyrateAngle": 2, "SingleGalleyTime": 5, "NewFlag": 1}),
    );
    let mut s = session(transport);
    let settings = s.settings().unwrap();
    assert_eq!(settings.brightness, 55);
    assert_eq!(settings.gyrate_angle, 2);
    assert_eq!(settings.single_gallery_time, 5);
    assert_eq!(s.state().settings(), Some(&settings));
    assert_eq!(s.state().field("new_flag"), Some(&json!(1)));
}

#[test]
fn white_balance_and_scoreboard_clamp() {
    let mut s = session(ScriptedTransport::new());
    s.set_white_balance(120, 50, -1).unwrap();
    assert_eq!(
        last_body(&s),
        json!({"Command": "Device/SetWhiteBalance", "RValue": 100, "GValue": 50, "BValue": 0})
    );
    s.set_scoreboard(1500, -2).unwrap();
    assert_eq!(
        last_body(&s),
        json!({"Command": "Tools/SetScoreBoard", "BlueScore": 999, "RedScore": 0})
    );
}

#[test]
fn clock_and_tool_commands_carry_their_params() {
    let mut s = session(ScriptedTransport::new());
    s.set_time_zone("GMT-5").unwrap();
    assert_eq!(last_body(&s)["TimeZoneValue"], json!("GMT-5"));
    s.set_location(30.29, 120.2).unwrap();
    assert_eq!(last_body(&s)["Latitude"], json!("30.29"));
    assert_eq!(last_body(&s)["Longitude"], json!("120.2"));
    s.set_countdown(1, 30, true).unwrap();
    assert_eq!(
        last_body(&s),
        json!({"Command": "Tools/SetTimer", "Minute": 1, "Second": 30, "Status": 1})
    );
    s.stopwatch(StopwatchAction::Reset).unwrap();
    assert_eq!(last_body(&s)["Status"], json!(2));
    s.set_rotation(Rotation::Deg270).unwrap();
    assert_eq!(last_body(&s)["Mode"], json!(3));
    s.play_buzzer(500, 500, 3000).unwrap();
    assert_eq!(last_body(&s)["PlayTotalTime"], json!(3000));
}

#[test]
fn tf_gif_sources_map_to_file_types() {
    let mut s = session(ScriptedTransport::new());
    s.play_tf_gif(&TfGif::Folder("divoom_gif".into())).unwrap();
    assert_eq!(
        last_body(&s),
        json!({"Command": "Device/PlayTFGif", "FileType": 1, "FileName": "divoom_gif"})
    );
}

#[test]
fn device_time_and_weather_decode() {
    let transport = ScriptedTransport::new()
        .reply("Device/GetDeviceTime", json!({"error_code": 0, "UTCTime": 1647200428, "LocalTime": "2022-03-14 03:40:28"}))
        .reply("Device/GetWeatherInfo", json!({"error_code": 0, "Weather": "Cloudy", "CurTemp": 33.68}));
    let mut s = session(transport);
    assert_eq!(s.device_time().unwrap().utc_time, 1647200428);
    let weather = s.weather().unwrap();
    assert_eq!(weather.weather.as_deref(), Some("Cloudy"));
    assert_eq!(weather.humidity, None);
}
