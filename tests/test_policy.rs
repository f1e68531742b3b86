use gatehouse::access::{AccessPolicy, IpPattern, PolicyDecision};
use gatehouse::config::ServerConfig;

const NO_RULES: [&str; 0] = [];

#[test]
fn test_policy_empty_lists_accept_everyone() {
    let policy = AccessPolicy::new(NO_RULES, NO_RULES);

    for ip in ["127.0.0.1", "10.0.0.5", "203.0.113.1", "0.0.0.0"] {
        assert_eq!(policy.decide(ip), PolicyDecision::Accepted);
    }
}

#[test]
fn test_policy_empty_accept_with_non_matching_reject() {
    let policy = AccessPolicy::new(NO_RULES, ["203.0.113.1", "198.51.100.*"]);

    assert_eq!(policy.decide("192.0.2.7"), PolicyDecision::Accepted);
    assert_eq!(policy.decide("203.0.113.10"), PolicyDecision::Accepted);
}

#[test]
fn test_policy_deny_takes_precedence() {
    let policy = AccessPolicy::new(["10.0.0.*"], ["10.0.0.5"]);

    assert_eq!(policy.decide("10.0.0.5"), PolicyDecision::RejectedByDenyList);
    assert_eq!(policy.decide("10.0.0.6"), PolicyDecision::Accepted);
}

#[test]
fn test_policy_allow_list_excludes_others() {
    let policy = AccessPolicy::new(["192.168.*", "127.0.0.1"], NO_RULES);

    assert_eq!(policy.decide("192.168.1.20"), PolicyDecision::Accepted);
    assert_eq!(policy.decide("127.0.0.1"), PolicyDecision::Accepted);
    assert_eq!(
        policy.decide("8.8.8.8"),
        PolicyDecision::RejectedNotInAllowList
    );
}

#[test]
fn test_policy_wildcard_segment() {
    let policy = AccessPolicy::new(["10.0.0.*"], NO_RULES);

    assert_eq!(policy.decide("10.0.0.5"), PolicyDecision::Accepted);
    assert_eq!(
        policy.decide("10.0.1.5"),
        PolicyDecision::RejectedNotInAllowList
    );
}

#[test]
fn test_policy_from_config() {
    let cfg = ServerConfig {
        accept: vec!["10.*".to_string()],
        reject: vec!["10.9.*".to_string()],
        ..ServerConfig::default()
    };
    let policy = AccessPolicy::from_config(&cfg);

    assert_eq!(policy.decide("10.1.2.3"), PolicyDecision::Accepted);
    assert_eq!(policy.decide("10.9.2.3"), PolicyDecision::RejectedByDenyList);
    assert_eq!(
        policy.decide("11.1.2.3"),
        PolicyDecision::RejectedNotInAllowList
    );
}

#[test]
fn test_policy_decision_helpers() {
    assert!(PolicyDecision::Accepted.is_accepted());
    assert!(!PolicyDecision::RejectedByDenyList.is_accepted());
    assert!(!PolicyDecision::RejectedNotInAllowList.is_accepted());
    assert_eq!(PolicyDecision::RejectedByDenyList.reason(), "matched reject list");
}

#[test]
fn test_pattern_is_whole_string_match() {
    let pattern = IpPattern::new("10.0.0.1");

    assert!(pattern.matches("10.0.0.1"));
    assert!(!pattern.matches("110.0.0.1"));
    assert!(!pattern.matches("10.0.0.15"));
    assert_eq!(pattern.as_str(), "10.0.0.1");
}

#[test]
fn test_pattern_dots_are_literal() {
    // No regex semantics: '.' only matches '.'.
    assert!(!IpPattern::new("10.0.0.1").matches("10x0x0x1"));
}
