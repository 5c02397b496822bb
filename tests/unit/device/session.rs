use serde_json::json;

use super::*;
use crate::device::mock::ScriptedTransport;

fn session(transport: ScriptedTransport) -> DeviceSession<ScriptedTransport> {
    DeviceSession::with_transport("192.168.1.7", MatrixSize::S64, transport)
}

#[test]
fn local_commands_go_to_the_post_endpoint() {
    let mut s = session(ScriptedTransport::new());
    assert_eq!(s.local_url(), "http://192.168.1.7:80/post");

    let status = s.local_status(&LocalCommand::new("Channel/SetBrightness").param("Brightness", 40)).unwrap();
    assert!(status.is_ok());

    let (url, body) = &s.transport().posts[0];
    assert_eq!(url, "http://192.168.1.7:80/post");
    assert_eq!(body, &json!({"Command": "Channel/SetBrightness", "Brightness": 40}));
}

#[test]
fn remote_requests_join_the_base_url() {
    let mut s = session(ScriptedTransport::new());
    s.remote(&RemoteRequest::new("Device/ReturnSameLANDevice")).unwrap();
    assert_eq!(s.transport().posts[0].0, "https://app.divoom-gz.com/Device/ReturnSameLANDevice");
    assert_eq!(s.state().last_return_code(), Some(0));
}

#[test]
fn invalid_remote_base_is_rejected() {
    let err = DeviceSession::with_transport("10.0.0.2", MatrixSize::S16, ScriptedTransport::new())
        .with_remote_base("not a url")
        .err()
        .unwrap();
    assert!(matches!(err, PixooError::Validation(_)));
}

#[test]
fn device_error_codes_are_recorded_not_raised() {
    let transport = ScriptedTransport::new().reply("Draw/ClearHttpText", json!({"error_code": 7}));
    let mut s = session(transport);
    let status = s.clear_text().unwrap();
    assert_eq!(status.error_code, 7);
    assert!(!status.is_ok());
    assert_eq!(s.state().last_error_code(), Some(7));
}

#[test]
fn transport_failures_propagate() {
    let mut s = session(ScriptedTransport::new().fail("Draw/ClearHttpText"));
    let err = s.clear_text().unwrap_err();
    assert!(matches!(err, PixooError::Transport(_)));
}

#[test]
fn animation_identity_is_recorded() {
    let transport = ScriptedTransport::new().reply("Draw/GetHttpGifId", json!({"error_code": 0, "PicId": 42}));
    let mut s = session(transport);
    assert_eq!(s.get_animation_identity().unwrap(), AnimationId(42));
    assert_eq!(s.state().animation_id(), Some(AnimationId(42)));
}

#[test]
fn identity_error_reply_reuses_the_last_known_id() {
    let mut s = session(ScriptedTransport::new());
    assert_eq!(s.get_animation_identity().unwrap(), AnimationId(1));

    s.transport_mut().set_reply("Draw/GetHttpGifId", json!({"error_code": 1}));
    assert_eq!(s.get_animation_identity().unwrap(), AnimationId(1));
    assert_eq!(s.state().last_error_code(), Some(1));
    assert_eq!(s.state().animation_id(), Some(AnimationId(1)));
}

#[test]
fn identity_error_reply_without_history_is_a_validation_error() {
    let transport = ScriptedTransport::new().reply("Draw/GetHttpGifId", json!({"error_code": 1}));
    let mut s = session(transport);
    let err = s.get_animation_identity().unwrap_err();
    assert!(matches!(err, PixooError::Validation(_)));
    assert_eq!(s.state().last_error_code(), Some(1));
}

#[test]
fn send_frame_carries_plan_and_ordinal() {
    let mut s = session(ScriptedTransport::new());
    let plan = sampler::plan(3, MAX_ANIMATION_FRAMES).unwrap();
    let buffer = MatrixBuffer::from_raw(64, vec![0; 64 * 64 * 3]).unwrap();
    s.send_frame(&plan, 2, AnimationId(5), 80, &encode(&buffer)).unwrap();

    let body = s.transport().bodies_for("Draw/SendHttpGif")[0];
    assert_eq!(body["PicNum"], json!(3));
    assert_eq!(body["PicWidth"], json!(64));
    assert_eq!(body["PicOffset"], json!(2));
    assert_eq!(body["PicID"], json!(5));
    assert_eq!(body["PicSpeed"], json!(80));
    assert_eq!(body["PicData"].as_str().unwrap().len(), 64 * 64 * 4);
}

#[test]
fn send_frame_rejects_ordinals_past_the_plan() {
    let mut s = session(ScriptedTransport::new());
    let plan = sampler::plan(2, MAX_ANIMATION_FRAMES).unwrap();
    let buffer = MatrixBuffer::from_raw(64, vec![0; 64 * 64 * 3]).unwrap();
    let err = s.send_frame(&plan, 2, AnimationId(1), 100, &encode(&buffer)).unwrap_err();
    assert!(matches!(err, PixooError::Validation(_)));
    assert!(s.transport().posts.is_empty());
}

#[test]
fn empty_static_buffer_sends_nothing() {
    let mut s = session(ScriptedTransport::new());
    assert_eq!(s.send_static_image(&MatrixBuffer::empty()).unwrap(), None);
    assert!(s.transport().posts.is_empty());
}

#[test]
fn static_image_is_a_one_frame_animation() {
    let mut s = session(ScriptedTransport::new());
    let buffer = MatrixBuffer::from_raw(64, vec![9; 64 * 64 * 3]).unwrap();
    let id = s.send_static_image(&buffer).unwrap();
    assert_eq!(id, Some(AnimationId(1)));
    assert_eq!(s.transport().keys(), ["Draw/GetHttpGifId", "Draw/SendHttpGif"]);

    let body = s.transport().bodies_for("Draw/SendHttpGif")[0];
    assert_eq!(body["PicNum"], json!(1));
    assert_eq!(body["PicOffset"], json!(0));
    assert_eq!(body["PicSpeed"], json!(1000));
}

#[test]
fn text_loads_fonts_once_and_sends_overlay() {
    let transport = ScriptedTransport::new().reply(
        "Device/GetTimeDialFontList",
        json!({"ReturnCode": 0, "FontList": [{"id": 2, "name": "8x8"}, {"id": 4, "name": "wide"}]}),
    );
    let mut s = session(transport);

    let mut text = TextOverlay::new(TextId::new(3).unwrap(), "hello");
    text.font = 4;
    text.width = 200;
    text.color = Rgb8::new(0, 128, 255);
    s.send_text(&text).unwrap();
    s.send_text(&text).unwrap();

    assert_eq!(
        s.transport().keys(),
        ["Device/GetTimeDialFontList", "Draw/SendHttpText", "Draw/SendHttpText"]
    );
    let body = s.transport().bodies_for("Draw/SendHttpText")[0];
    assert_eq!(body["TextId"], json!(3));
    assert_eq!(body["font"], json!(4));
    assert_eq!(body["TextWidth"], json!(64));
    assert_eq!(body["TextString"], json!("hello"));
    assert_eq!(body["color"], json!("#0080FF"));
    assert_eq!(body["align"], json!(2));
    assert_eq!(body["dir"], json!(0));
}

#[test]
fn unknown_font_still_sends() {
    let transport = ScriptedTransport::new().reply(
        "Device/GetTimeDialFontList",
        json!({"ReturnCode": 0, "FontList": [{"id": 2}]}),
    );
    let mut s = session(transport);
    let mut text = TextOverlay::new(TextId::new(0).unwrap(), "x");
    text.font = 99;
    s.send_text(&text).unwrap();
    assert_eq!(s.state().has_font(99), Some(false));
    assert_eq!(s.transport().bodies_for("Draw/SendHttpText").len(), 1);
}

#[test]
fn unreachable_font_catalogue_does_not_block_text() {
    let mut s = session(ScriptedTransport::new().fail("Device/GetTimeDialFontList"));
    s.send_text(&TextOverlay::new(TextId::new(1).unwrap(), "offline")).unwrap();
    assert_eq!(s.transport().bodies_for("Draw/SendHttpText").len(), 1);
    assert_eq!(s.state().has_font(0), None);
}

#[test]
fn oversized_text_is_rejected_before_sending() {
    let mut s = session(ScriptedTransport::new());
    let text = TextOverlay::new(TextId::new(1).unwrap(), "a".repeat(600));
    assert!(matches!(s.send_text(&text).unwrap_err(), PixooError::Validation(_)));
    assert!(s.transport().posts.is_empty());
}

#[test]
fn font_catalogue_error_is_not_cached() {
    let transport = ScriptedTransport::new().reply("Device/GetTimeDialFontList", json!({"ReturnCode": 1}));
    let mut s = session(transport);
    let text = TextOverlay::new(TextId::new(0).unwrap(), "retry");
    s.send_text(&text).unwrap();
    s.send_text(&text).unwrap();

    assert!(s.state().fonts().is_none());
    assert_eq!(s.state().has_font(0), None);
    assert_eq!(s.transport().bodies_for("Device/GetTimeDialFontList").len(), 2);
    assert_eq!(s.transport().bodies_for("Draw/SendHttpText").len(), 2);
}

#[test]
fn lan_device_error_is_not_cached() {
    let transport = ScriptedTransport::new().reply("Device/ReturnSameLANDevice", json!({"ReturnCode": 3}));
    let mut s = session(transport);
    assert!(s.ensure_devices_loaded().unwrap().is_empty());
    assert!(s.state().devices().is_none());
}

#[test]
fn refresh_fonts_refetches() {
    let mut s = session(ScriptedTransport::new());
    s.ensure_fonts_loaded().unwrap();
    s.ensure_fonts_loaded().unwrap();
    s.refresh_fonts().unwrap();
    assert_eq!(s.transport().bodies_for("Device/GetTimeDialFontList").len(), 2);
}

#[test]
fn lan_devices_are_decoded() {
    let transport = ScriptedTransport::new().reply(
        "Device/ReturnSameLANDevice",
        json!({
            "ReturnCode": 0,
            "DeviceList": [{
                "DeviceName": "Pixoo64",
                "DeviceId": 300000001,
                "DevicePrivateIP": "192.168.1.7",
                "DeviceMac": "aa:bb"
            }]
        }),
    );
    let mut s = session(transport);
    let devices = s.ensure_devices_loaded().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_private_ip, "192.168.1.7");
}

#[test]
fn dial_list_skips_unknown_types() {
    let transport = ScriptedTransport::new()
        .reply("Channel/GetDialType", json!({"ReturnCode": 0, "DialTypeList": ["Social", "Game"]}))
        .reply(
            "Channel/GetDialList",
            json!({"ReturnCode": 0, "TotalNum": 1, "DialList": [{"ClockId": 10, "Name": "Big"}]}),
        );
    let mut s = session(transport);

    assert!(s.dial_list("Weather", 1).unwrap().is_none());
    let list = s.dial_list("Game", 1).unwrap().unwrap();
    assert_eq!(list.dial_list[0].clock_id, 10);

    assert_eq!(
        s.transport().keys(),
        ["Channel/GetDialType", "Channel/GetDialList"]
    );
    let body = s.transport().bodies_for("Channel/GetDialList")[0];
    assert_eq!(body, &json!({"DialType": "Game", "Page": 1}));
}
