use async_trait::async_trait;
use openc2::consumer::{Actuator, Consumer};
use openc2::language::{
    Action, Command, Device, Feature, Features, Message, Response, StatusCode, TargetEnum,
};
use openc2::profiles::slpf::{self, DryRunActuator, RuleId, SlpfResults};
use openc2::registry::Registry;
use openc2::transport::Dispatch;
use openc2::types::{Ipv4Net, Openc2Type};
use openc2::Result;
use serde_json::json;
use std::sync::Arc;

fn consumer() -> Consumer {
    let mut registry = Registry::new();
    slpf::register(&mut registry).unwrap();
    Consumer::new(registry.into_shared(), "fw1")
        .with_actuator(Arc::new(DryRunActuator::new()))
        .unwrap()
}

#[tokio::test]
async fn test_query_features_answered_by_consumer() {
    let consumer = consumer();
    let features = Features::new(vec![Feature::VERSIONS, Feature::PROFILES, Feature::PAIRS]).unwrap();
    let cmd = Command::new(Action::QUERY, features, consumer.registry()).unwrap();
    let req = Message::new(cmd).with_from("producer");
    let reply = consumer.dispatch(req.clone()).await;

    assert_eq!(reply.request_id, req.request_id);
    assert_eq!(reply.to, vec!["producer".to_string()]);
    let resp = reply.response().unwrap();
    assert_eq!(resp.status, StatusCode::OK);

    let wire = resp.encode().unwrap();
    assert_eq!(wire["results"]["versions"], json!(["1.0"]));
    assert_eq!(wire["results"]["profiles"], json!(["slpf"]));
    assert_eq!(
        wire["results"]["pairs"]["delete"],
        json!(["slpf:rule_number"])
    );

    let results = resp.results.as_ref().unwrap().to_base(consumer.registry()).unwrap();
    let pairs = results.pairs.unwrap();
    let deny = pairs.get(&Action::DENY).unwrap();
    let net = TargetEnum::from_name("ipv4_net", consumer.registry()).unwrap();
    assert!(deny.iter().any(|t| *t == net));
}

#[tokio::test]
async fn test_deny_assigns_rule_numbers() {
    let consumer = consumer();
    let registry = consumer.registry();
    let net = Ipv4Net::new("198.51.100.0", 24).unwrap();
    let first = consumer
        .dispatch(Message::new(Command::new(Action::DENY, net, registry).unwrap()))
        .await;
    let second = consumer
        .dispatch(Message::new(Command::new(Action::DENY, net, registry).unwrap()))
        .await;

    let rule = |msg: &Message| {
        msg.response()
            .and_then(|r| r.results.as_ref())
            .and_then(|r| r.downcast_ref::<SlpfResults>())
            .and_then(|r| r.rule_number)
    };
    assert_eq!(rule(&first), Some(RuleId(1)));
    assert_eq!(rule(&second), Some(RuleId(2)));
    assert_eq!(first.from.as_deref(), Some("fw1"));
}

#[tokio::test]
async fn test_unsupported_pair_is_not_implemented() {
    let consumer = consumer();
    let device = Device {
        hostname: Some("ws-12".into()),
        ..Default::default()
    };
    let cmd = Command::new(Action::CONTAIN, device, consumer.registry()).unwrap();
    let reply = consumer.dispatch(Message::new(cmd)).await;
    assert_eq!(reply.status, Some(StatusCode::NOT_IMPLEMENTED));
    let text = reply.response().unwrap().status_text.clone().unwrap();
    assert!(text.starts_with("Not implemented"));
}

#[tokio::test]
async fn test_response_message_is_rejected() {
    let consumer = consumer();
    let reply = consumer.dispatch(Message::new(Response::ok())).await;
    assert_eq!(reply.status, Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_invalid_args_are_bad_request() {
    let consumer = consumer();
    let wire = json!({
        "headers": {"request_id": "r-7", "from": "producer"},
        "body": {"openc2": {"request": {
            "action": "deny",
            "target": {"ipv4_net": "10.0.0.0/8"},
            "args": {"start_time": 2000, "stop_time": 1000}
        }}}
    });
    let reply = consumer.dispatch_value(&wire).await;
    assert_eq!(reply.request_id, "r-7");
    assert_eq!(reply.status, Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_unknown_actuator_profile() {
    let mut registry = Registry::new();
    slpf::register(&mut registry).unwrap();
    let consumer = Consumer::new(registry.into_shared(), "empty");
    let wire = json!({"body": {"openc2": {"request": {
        "action": "deny",
        "target": {"ipv4_net": "10.0.0.0/8"},
        "actuator": {"slpf": {"hostname": "fw1"}}
    }}}});
    let reply = consumer.dispatch_value(&wire).await;
    assert_eq!(reply.status, Some(StatusCode::NOT_IMPLEMENTED));
}

struct Failing;

const FAILING_PAIRS: &[(&str, &[&str])] = &[("allow", &["ipv4_net"])];

#[async_trait]
impl Actuator for Failing {
    fn profile(&self) -> &str {
        "slpf"
    }

    fn pairs(&self) -> &[(&'static str, &'static [&'static str])] {
        FAILING_PAIRS
    }

    async fn run(&self, _command: &Command, _registry: &Registry) -> Result<Response> {
        Err(openc2::Openc2Error::Io(std::io::Error::other("filter offline")))
    }
}

#[tokio::test]
async fn test_actuator_failure_is_internal_error() {
    let mut registry = Registry::new();
    slpf::register(&mut registry).unwrap();
    let consumer = Consumer::new(registry.into_shared(), "fw1")
        .with_actuator(Arc::new(Failing))
        .unwrap();
    let net = Ipv4Net::host("10.1.1.1").unwrap();
    let cmd = Command::new(Action::ALLOW, net, consumer.registry()).unwrap();
    let reply = consumer.dispatch(Message::new(cmd)).await;
    assert_eq!(reply.status, Some(StatusCode::INTERNAL_ERROR));
}
