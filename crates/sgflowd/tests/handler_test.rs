mod common;

use common::*;
use futures_util::{StreamExt, stream};
use sgflow_cloud::{Direction, Permission, SecurityGroup};
use sgflow_core::{Request, Rule};
use sgflowd::{Outcome, serve};

fn two_rule_request() -> Request {
    Request {
        rules: vec![
            Rule::new(Direction::Ingress, "10.0.10.100/32", 80, 8080, "tcp"),
            Rule::new(Direction::Egress, "8.8.8.8/32", 80, 8080, "tcp"),
        ],
        ..ssh_request()
    }
}

fn error_message(payload: &[u8]) -> String {
    Request::decode(payload).unwrap().error_message
}

#[tokio::test]
async fn test_valid_request_is_reported_done() {
    let daemon = TestDaemon::new(FakeFactory::new(SecurityGroup::new(GROUP_ID)));
    let request = two_rule_request();

    let outcome = daemon.handler.handle(&request.encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(daemon.publisher.on(DONE).len(), 1);
    assert!(daemon.publisher.on(ERROR).is_empty());
    assert_eq!(
        daemon.factory.calls(),
        vec![
            Call::Authorize(
                Direction::Ingress,
                vec![Permission::new(80, 8080, "tcp", "10.0.10.100/32")]
            ),
            Call::Authorize(
                Direction::Egress,
                vec![Permission::new(80, 8080, "tcp", "8.8.8.8/32")]
            ),
        ]
    );
}

#[tokio::test]
async fn test_done_payload_is_the_request_unchanged() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let body = ssh_request().encode().unwrap();

    daemon.handler.handle(&body).await;

    assert_eq!(daemon.publisher.on(DONE), vec![body]);
}

#[tokio::test]
async fn test_done_payload_matches_compact_inbound_body() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let body = format!(
        concat!(
            r#"{{"_uuid":"2c0b6c1e","_batch_id":"batch-1","_type":"aws","#,
            r#""datacenter_vpc_id":"vpc-0a1b2c3d","datacenter_region":"eu-west-1","#,
            r#""datacenter_access_key":"AKIAEXAMPLE","datacenter_access_token":"secret","#,
            r#""network_aws_id":"subnet-0a1b2c3d","security_group_aws_id":"{}","name":"web","#,
            r#""rules":[{{"type":"ingress","source_ip":"0.0.0.0/0","source_port":22,"#,
            r#""destination_port":22,"protocol":"tcp"}}]}}"#,
        ),
        GROUP_ID
    )
    .into_bytes();

    let outcome = daemon.handler.handle(&body).await;

    assert_eq!(outcome, Outcome::Done);
    assert_eq!(daemon.publisher.on(DONE), vec![body]);
}

#[tokio::test]
async fn test_request_credentials_and_region_reach_the_provider() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));

    daemon.handler.handle(&ssh_request().encode().unwrap()).await;

    let connections = daemon.factory.connections.lock().unwrap().clone();
    assert_eq!(
        connections,
        vec![("eu-west-1".to_string(), "AKIAEXAMPLE".to_string())]
    );
}

#[tokio::test]
async fn test_missing_resource_id_is_reported_as_error() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let request = Request {
        resource_id: String::new(),
        ..two_rule_request()
    };

    let outcome = daemon.handler.handle(&request.encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Failed);
    assert!(daemon.publisher.on(DONE).is_empty());
    let errors = daemon.publisher.on(ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(error_message(&errors[0]), "Datacenter VPC ID invalid");
    assert!(daemon.factory.connections.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_echoed_on_error_subject() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let body = br#"{"_uuid": "abc", "rules": "#.to_vec();

    let outcome = daemon.handler.handle(&body).await;

    assert_eq!(outcome, Outcome::Malformed);
    assert_eq!(daemon.publisher.messages(), vec![(ERROR.to_string(), body)]);
    assert!(daemon.factory.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_security_group_is_reported() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()).failing(Failure::NotFound));

    let outcome = daemon.handler.handle(&ssh_request().encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Failed);
    let errors = daemon.publisher.on(ERROR);
    assert_eq!(errors.len(), 1);
    assert_eq!(
        error_message(&errors[0]),
        format!("Could not find security group: {}", GROUP_ID)
    );
}

#[tokio::test]
async fn test_connect_failure_is_reported() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()).failing(Failure::Connect));

    let outcome = daemon.handler.handle(&ssh_request().encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(daemon.publisher.on(ERROR).len(), 1);
    assert!(daemon.publisher.on(DONE).is_empty());
}

#[tokio::test]
async fn test_stale_permission_is_revoked() {
    let group = SecurityGroup::new(GROUP_ID).with_ingress(vec![
        Permission::new(80, 8080, "tcp", "10.0.10.100/32"),
        Permission::new(1024, 1024, "tcp", "10.0.10.100/32"),
        Permission::new(99, 99, "tcp", "10.0.10.100/32"),
    ]);
    let daemon = TestDaemon::new(FakeFactory::new(group));
    let request = Request {
        rules: vec![
            Rule::new(Direction::Ingress, "10.0.10.100/32", 80, 8080, "tcp"),
            Rule::new(Direction::Ingress, "10.0.10.100/32", 1024, 1024, "tcp"),
        ],
        ..ssh_request()
    };

    daemon.handler.handle(&request.encode().unwrap()).await;

    assert_eq!(
        daemon.factory.calls(),
        vec![Call::Revoke(
            Direction::Ingress,
            vec![Permission::new(99, 99, "tcp", "10.0.10.100/32")]
        )]
    );
}

#[tokio::test]
async fn test_new_permission_is_authorized() {
    let group = SecurityGroup::new(GROUP_ID).with_ingress(vec![
        Permission::new(80, 8080, "tcp", "10.0.10.100/32"),
        Permission::new(1024, 1024, "tcp", "10.0.10.100/32"),
    ]);
    let daemon = TestDaemon::new(FakeFactory::new(group));
    let request = Request {
        rules: vec![
            Rule::new(Direction::Ingress, "10.0.10.100/32", 80, 8080, "tcp"),
            Rule::new(Direction::Ingress, "10.0.10.100/32", 1024, 1024, "tcp"),
            Rule::new(Direction::Ingress, "10.0.10.100/32", 11, 11, "tcp"),
        ],
        ..ssh_request()
    };

    daemon.handler.handle(&request.encode().unwrap()).await;

    assert_eq!(
        daemon.factory.calls(),
        vec![Call::Authorize(
            Direction::Ingress,
            vec![Permission::new(11, 11, "tcp", "10.0.10.100/32")]
        )]
    );
}

#[tokio::test]
async fn test_converged_group_issues_no_calls() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));

    let outcome = daemon.handler.handle(&ssh_request().encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Done);
    assert!(daemon.factory.calls().is_empty());
}

#[tokio::test]
async fn test_apply_failure_stops_and_reports_once() {
    let group = SecurityGroup::new(GROUP_ID)
        .with_ingress(vec![Permission::new(99, 99, "tcp", "10.0.10.100/32")]);
    let daemon = TestDaemon::new(FakeFactory::new(group).failing(Failure::Authorize));

    let outcome = daemon.handler.handle(&two_rule_request().encode().unwrap()).await;

    assert_eq!(outcome, Outcome::Failed);
    // The ingress revoke went through before the authorize failed
    assert_eq!(
        daemon.factory.calls(),
        vec![Call::Revoke(
            Direction::Ingress,
            vec![Permission::new(99, 99, "tcp", "10.0.10.100/32")]
        )]
    );
    let errors = daemon.publisher.on(ERROR);
    assert_eq!(errors.len(), 1);
    assert!(error_message(&errors[0]).contains("InvalidPermission.Duplicate"));
}

#[tokio::test]
async fn test_serve_reports_every_message_once() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let invalid = Request {
        name: String::new(),
        ..ssh_request()
    };
    let messages = vec![
        ssh_request().encode().unwrap(),
        invalid.encode().unwrap(),
        b"not json".to_vec(),
        ssh_request().encode().unwrap(),
    ];

    serve(
        stream::iter(messages),
        daemon.handler.clone(),
        std::future::pending(),
    )
    .await;

    assert_eq!(daemon.publisher.messages().len(), 4);
    assert_eq!(daemon.publisher.on(DONE).len(), 2);
    assert_eq!(daemon.publisher.on(ERROR).len(), 2);
}

#[tokio::test]
async fn test_serve_stops_on_shutdown() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));

    serve(
        stream::pending::<Vec<u8>>(),
        daemon.handler.clone(),
        std::future::ready(()),
    )
    .await;

    assert!(daemon.publisher.messages().is_empty());
}

#[tokio::test]
async fn test_serve_handles_buffered_messages_on_shutdown() {
    let daemon = TestDaemon::new(FakeFactory::new(ssh_group()));
    let buffered = vec![
        ssh_request().encode().unwrap(),
        b"not json".to_vec(),
        ssh_request().encode().unwrap(),
    ];

    serve(
        stream::iter(buffered).chain(stream::pending()),
        daemon.handler.clone(),
        std::future::ready(()),
    )
    .await;

    assert_eq!(daemon.publisher.on(DONE).len(), 2);
    assert_eq!(daemon.publisher.on(ERROR).len(), 1);
}
