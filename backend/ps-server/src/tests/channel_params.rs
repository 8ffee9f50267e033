use crate::api::channel_params::ChannelParams;

use ps_core::ReplayCursor;

#[test]
fn given_no_cursor_params_when_cursor_then_none() {
    let params = ChannelParams {
        id: Some("news".into()),
        ..ChannelParams::default()
    };

    assert_eq!(params.cursor(), None);
}

#[test]
fn given_all_cursor_params_when_cursor_then_last_event_id_wins() {
    let params = ChannelParams {
        last_event_id: Some(4),
        since: Some(100),
        backtrack: Some(2),
        ..ChannelParams::default()
    };

    assert_eq!(params.cursor(), Some(ReplayCursor::AfterId(4)));
}

#[test]
fn given_since_without_tag_when_cursor_then_whole_second_seen() {
    let params = ChannelParams {
        since: Some(100),
        ..ChannelParams::default()
    };

    assert_eq!(
        params.cursor(),
        Some(ReplayCursor::Since {
            time: 100,
            tag: u32::MAX
        })
    );
}

#[test]
fn given_since_and_tag_when_cursor_then_exact_position() {
    let params = ChannelParams {
        since: Some(100),
        tag: Some(2),
        backtrack: Some(9),
        ..ChannelParams::default()
    };

    assert_eq!(
        params.cursor(),
        Some(ReplayCursor::Since { time: 100, tag: 2 })
    );
}

#[test]
fn given_backtrack_when_cursor_then_backtrack() {
    let params = ChannelParams {
        backtrack: Some(3),
        ..ChannelParams::default()
    };

    assert_eq!(params.cursor(), Some(ReplayCursor::Backtrack(3)));
}
