use openc2::language::{
    Action, Command, Device, Feature, FeatureKind, Features, File, Hashes, Ipv4Connection,
    L4Protocol, Process, Response, StatusCode, Target,
};
use openc2::types::{Binaryx, Decode, Duration, Ipv4Net, Openc2Type};
use openc2::{Openc2Error, Registry};
use serde_json::json;

#[test]
fn test_duration_wire_value() {
    let registry = Registry::new();
    let d = Duration::new(5000).unwrap();
    assert_eq!(d.encode().unwrap(), json!(5000));
    assert_eq!(Duration::decode(&json!(5000), &registry).unwrap().as_millis(), 5000);
    assert!(Duration::new(-1).is_err());
}

#[test]
fn test_query_features_command() {
    let registry = Registry::new();
    let features = Features::new(vec![Feature::VERSIONS, Feature::PROFILES]).unwrap();
    let cmd = Command::new(Action::QUERY, features, &registry).unwrap();
    let wire = cmd.encode().unwrap();
    assert_eq!(
        wire,
        json!({"action": "query", "target": {"features": ["versions", "profiles"]}})
    );
    assert_eq!(Command::decode(&wire, &registry).unwrap(), cmd);
}

#[test]
fn test_binaryx_is_case_insensitive() {
    let registry = Registry::new();
    let bytes = Binaryx::new(vec![0xAB, 0xCD]);
    assert_eq!(bytes.encode().unwrap(), json!("ABCD"));
    assert_eq!(Binaryx::decode(&json!("abcd"), &registry).unwrap(), bytes);
}

#[test]
fn test_unknown_record_field() {
    let registry = Registry::new();
    let err = Device::decode(&json!({"unknown_field": 1}), &registry).unwrap_err();
    assert!(matches!(err, Openc2Error::Schema(_)));
}

#[test]
fn test_ipv4_net_parts() {
    let net = Ipv4Net::new("10.0.0.0", 8).unwrap();
    assert_eq!(net.encode().unwrap(), json!("10.0.0.0/8"));
    assert_eq!(net.addr(), "10.0.0.0");
    assert_eq!(net.prefix(), Some(8));
}

#[test]
fn test_choice_needs_exactly_one_known_key() {
    let registry = Registry::new();
    assert!(Target::decode(&json!({}), &registry).is_err());
    assert!(Target::decode(
        &json!({"ipv4_net": "10.0.0.0/8", "ipv6_net": "::1"}),
        &registry
    )
    .is_err());
    assert!(matches!(
        Target::decode(&json!({"mac_addr": "00:11"}), &registry),
        Err(Openc2Error::Schema(_))
    ));
}

#[test]
fn test_record_sparsity() {
    let registry = Registry::new();
    let device = Device {
        hostname: Some("fw1".into()),
        ..Default::default()
    };
    let wire = device.encode().unwrap();
    assert_eq!(wire, json!({"hostname": "fw1"}));
    assert_eq!(Device::decode(&wire, &registry).unwrap(), device);
    assert!(matches!(Device::default().encode(), Err(Openc2Error::Value(_))));
}

#[test]
fn test_nested_targets() {
    let registry = Registry::new();
    let file = File {
        path: Some("/usr/bin/sshd".into()),
        hashes: Some(Hashes {
            md5: Some(Binaryx::new(vec![0x11; 16])),
            ..Default::default()
        }),
        ..Default::default()
    };
    let proc = Process {
        pid: Some(4242),
        executable: Some(file),
        parent: Some(Box::new(Process {
            pid: Some(1),
            ..Default::default()
        })),
        ..Default::default()
    };
    let cmd = Command::new(Action::STOP, proc.clone(), &registry).unwrap();
    let wire = cmd.encode().unwrap();
    assert_eq!(wire["target"]["process"]["parent"], json!({"pid": 1}));
    let back = Command::decode(&wire, &registry).unwrap();
    assert_eq!(back.target.downcast_ref::<Process>(), Some(&proc));
}

#[test]
fn test_bad_digest_length() {
    let registry = Registry::new();
    let wire = json!({"file": {"hashes": {"sha256": "ABCD"}}});
    assert!(matches!(
        Target::decode(&wire, &registry),
        Err(Openc2Error::Value(_))
    ));
}

#[test]
fn test_connection_target() {
    let registry = Registry::new();
    let conn = Ipv4Connection {
        src_addr: Some(Ipv4Net::host("192.168.0.1").unwrap()),
        dst_port: Some(443),
        protocol: Some(L4Protocol::TCP),
        ..Default::default()
    };
    let cmd = Command::new(Action::DENY, conn, &registry).unwrap();
    assert_eq!(
        cmd.encode().unwrap(),
        json!({"action": "deny", "target": {"ipv4_connection": {
            "src_addr": "192.168.0.1", "dst_port": 443, "protocol": "tcp"
        }}})
    );

    let too_far = json!({"ipv4_connection": {"dst_port": 70000}});
    assert!(Target::decode(&too_far, &registry).is_err());
}

#[test]
fn test_feature_extension() {
    let mut registry = Registry::new();
    assert!(registry.extend_enum::<FeatureKind>("export_fields", 11).unwrap());
    let feature = Feature::from_name("export_fields", &registry).unwrap();
    assert_eq!(feature.encode().unwrap(), json!("export_fields"));
    assert_eq!(
        Feature::decode(&json!("export_fields"), &registry).unwrap(),
        feature
    );

    assert!(!registry.extend_enum::<FeatureKind>("export_fields", 11).unwrap());
    assert!(registry.extend_enum::<FeatureKind>("export_fields", 12).is_err());
    assert!(Feature::decode(&json!("export_fields"), &Registry::new()).is_err());
}

#[test]
fn test_response_status_is_numeric() {
    let registry = Registry::new();
    let resp = Response::new(StatusCode::NOT_FOUND).with_text("no such rule");
    let wire = resp.encode().unwrap();
    assert_eq!(wire, json!({"status": 404, "status_text": "no such rule"}));
    assert_eq!(Response::decode(&wire, &registry).unwrap(), resp);
}

#[test]
fn test_bounded_features() {
    let eleven = vec![Feature::PAIRS; 11];
    assert!(Features::new(eleven).is_err());
    assert!(Features::new(vec![Feature::PAIRS; 10]).is_ok());
}
