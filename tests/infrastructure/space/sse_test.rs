use parrot_relay::infrastructure::space::sse::{SseDecoder, SseEvent};

#[test]
fn given_complete_events_when_feeding_then_yields_each_event() {
    let mut decoder = SseDecoder::new();

    let events = decoder.feed(b"event: generating\ndata: null\n\nevent: complete\ndata: [1]\n\n");

    assert_eq!(
        events,
        vec![
            SseEvent {
                event: Some("generating".to_string()),
                data: "null".to_string()
            },
            SseEvent {
                event: Some("complete".to_string()),
                data: "[1]".to_string()
            },
        ]
    );
}

#[test]
fn given_event_split_across_chunks_when_feeding_then_waits_for_blank_line() {
    let mut decoder = SseDecoder::new();

    assert!(decoder.feed(b"event: comp").is_empty());
    assert!(decoder.feed(b"lete\ndata: [\"a\"]\n").is_empty());
    let events = decoder.feed(b"\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name(), Some("complete"));
    assert_eq!(events[0].data, "[\"a\"]");
}

#[test]
fn given_crlf_and_comments_when_feeding_then_ignores_them() {
    let mut decoder = SseDecoder::new();

    let events = decoder.feed(b": ping\r\n\r\ndata: {\"msg\": \"estimation\"}\r\n\r\n");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, None);
    assert_eq!(events[0].data, "{\"msg\": \"estimation\"}");
}

#[test]
fn given_multiline_data_when_feeding_then_joins_with_newline() {
    let mut decoder = SseDecoder::new();

    let events = decoder.feed(b"data: first\ndata: second\n\n");

    assert_eq!(events[0].data, "first\nsecond");
}

#[test]
fn given_unterminated_event_when_finishing_then_flushes_it() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: error\ndata: \"boom\"").is_empty());

    let event = decoder.finish().unwrap();

    assert_eq!(event.event_name(), Some("error"));
    assert_eq!(event.data, "\"boom\"");
    assert!(decoder.finish().is_none());
}
