use parrot_relay::domain::EndpointCandidate;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn given_override_and_conventional_names_when_ordering_then_override_first_and_indexes_last() {
    let candidates =
        EndpointCandidate::ordered(Some("/voice"), &names(&["/predict", "/convert"]), 2);

    assert_eq!(
        candidates,
        vec![
            EndpointCandidate::named("/voice"),
            EndpointCandidate::named("/predict"),
            EndpointCandidate::named("/convert"),
            EndpointCandidate::Index(0),
            EndpointCandidate::Index(1),
        ]
    );
}

#[test]
fn given_override_repeating_a_conventional_name_when_ordering_then_keeps_first_occurrence() {
    let candidates = EndpointCandidate::ordered(
        Some("predict"),
        &names(&["/predict", "/run", "run"]),
        0,
    );

    assert_eq!(
        candidates,
        vec![
            EndpointCandidate::named("/predict"),
            EndpointCandidate::named("/run"),
        ]
    );
}

#[test]
fn given_numeric_override_when_ordering_then_index_moves_to_front() {
    let candidates = EndpointCandidate::ordered(Some("2"), &names(&["/predict"]), 3);

    assert_eq!(
        candidates,
        vec![
            EndpointCandidate::Index(2),
            EndpointCandidate::named("/predict"),
            EndpointCandidate::Index(0),
            EndpointCandidate::Index(1),
        ]
    );
}

#[test]
fn given_blank_override_when_ordering_then_it_is_ignored() {
    let candidates = EndpointCandidate::ordered(Some("  "), &names(&["", "/run"]), 1);

    assert_eq!(
        candidates,
        vec![EndpointCandidate::named("/run"), EndpointCandidate::Index(0)]
    );
}

#[test]
fn given_text_when_parsing_then_digits_become_indexes_and_names_gain_slash() {
    assert_eq!("3".parse::<EndpointCandidate>(), Ok(EndpointCandidate::Index(3)));
    assert_eq!(
        "predict".parse::<EndpointCandidate>(),
        Ok(EndpointCandidate::Named("/predict".to_string()))
    );
    assert!("".parse::<EndpointCandidate>().is_err());
    assert!("bad name".parse::<EndpointCandidate>().is_err());
}

#[test]
fn given_candidate_when_displaying_then_round_trips_through_query_string() {
    for candidate in [EndpointCandidate::named("/convert"), EndpointCandidate::Index(1)] {
        assert_eq!(candidate.to_string().parse::<EndpointCandidate>(), Ok(candidate));
    }
}

#[test]
fn given_named_candidate_then_route_name_drops_leading_slash() {
    assert_eq!(
        EndpointCandidate::named("/predict").route_name(),
        Some("predict")
    );
    assert_eq!(EndpointCandidate::Index(0).route_name(), None);
}
