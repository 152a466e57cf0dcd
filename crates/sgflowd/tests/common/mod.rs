use async_trait::async_trait;
use sgflow_cloud::{
    CloudError, Credentials, Direction, Permission, ProviderFactory, SecurityGroup,
    SecurityGroupProvider,
};
use sgflow_core::{Request, Rule};
use sgflowd::{BusError, Handler, Publisher, Reporter};
use std::sync::{Arc, Mutex};

pub const DONE: &str = "firewall.update.aws.done";
pub const ERROR: &str = "firewall.update.aws.error";
pub const GROUP_ID: &str = "sg-0123456789abcdef0";

/// Publisher that keeps every message in memory
#[derive(Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryPublisher {
    pub fn messages(&self) -> Vec<(String, Vec<u8>)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn on(&self, subject: &str) -> Vec<Vec<u8>> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| s == subject)
            .map(|(_, payload)| payload)
            .collect()
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, subject: &str, payload: Vec<u8>) -> Result<(), BusError> {
        self.messages
            .lock()
            .unwrap()
            .push((subject.to_string(), payload));
        Ok(())
    }
}

/// Provider call as seen by the fake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Revoke(Direction, Vec<Permission>),
    Authorize(Direction, Vec<Permission>),
}

/// How the fake provider should misbehave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Failure {
    #[default]
    None,
    Connect,
    NotFound,
    Authorize,
}

/// In-memory provider serving one preset security group
pub struct FakeProvider {
    group: SecurityGroup,
    failure: Failure,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[async_trait]
impl SecurityGroupProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn describe_security_group(&self, group_id: &str) -> sgflow_cloud::Result<SecurityGroup> {
        if self.failure == Failure::NotFound || group_id != self.group.id {
            return Err(CloudError::SecurityGroupNotFound(group_id.to_string()));
        }
        Ok(self.group.clone())
    }

    async fn revoke(
        &self,
        _group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> sgflow_cloud::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Revoke(direction, permissions.to_vec()));
        Ok(())
    }

    async fn authorize(
        &self,
        _group_id: &str,
        direction: Direction,
        permissions: &[Permission],
    ) -> sgflow_cloud::Result<()> {
        if self.failure == Failure::Authorize {
            return Err(CloudError::ApiError(
                "InvalidPermission.Duplicate: the rule already exists".to_string(),
            ));
        }
        self.calls
            .lock()
            .unwrap()
            .push(Call::Authorize(direction, permissions.to_vec()));
        Ok(())
    }
}

pub struct FakeFactory {
    pub group: SecurityGroup,
    pub failure: Failure,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub connections: Mutex<Vec<(String, String)>>,
}

impl FakeFactory {
    pub fn new(group: SecurityGroup) -> Self {
        Self {
            group,
            failure: Failure::None,
            calls: Arc::default(),
            connections: Mutex::default(),
        }
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderFactory for FakeFactory {
    async fn connect(
        &self,
        region: &str,
        credentials: &Credentials,
    ) -> sgflow_cloud::Result<Box<dyn SecurityGroupProvider>> {
        self.connections
            .lock()
            .unwrap()
            .push((region.to_string(), credentials.access_key.clone()));

        if self.failure == Failure::Connect {
            return Err(CloudError::AuthenticationFailed(
                "the security token included in the request is invalid".to_string(),
            ));
        }

        Ok(Box::new(FakeProvider {
            group: self.group.clone(),
            failure: self.failure,
            calls: self.calls.clone(),
        }))
    }
}

pub struct TestDaemon {
    pub publisher: Arc<MemoryPublisher>,
    pub factory: Arc<FakeFactory>,
    pub handler: Arc<Handler>,
}

impl TestDaemon {
    pub fn new(factory: FakeFactory) -> Self {
        let publisher = Arc::new(MemoryPublisher::default());
        let factory = Arc::new(factory);
        let reporter = Reporter::new(publisher.clone(), DONE, ERROR);
        let handler = Arc::new(Handler::new(factory.clone(), reporter));
        Self {
            publisher,
            factory,
            handler,
        }
    }
}

/// Group that already has inbound SSH from anywhere
pub fn ssh_group() -> SecurityGroup {
    SecurityGroup::new(GROUP_ID)
        .with_ingress(vec![Permission::new(22, 22, "tcp", "0.0.0.0/0")])
}

/// Valid request asking for exactly inbound SSH from anywhere
pub fn ssh_request() -> Request {
    Request {
        id: "2c0b6c1e-1f4e-4a43-9a36-5f3b5c3f1d2a".to_string(),
        batch_id: "batch-1".to_string(),
        provider_type: "aws".to_string(),
        resource_id: "vpc-0a1b2c3d".to_string(),
        region: "eu-west-1".to_string(),
        access_key: "AKIAEXAMPLE".to_string(),
        access_token: "secret".to_string(),
        network_id: "subnet-0a1b2c3d".to_string(),
        security_group_id: GROUP_ID.to_string(),
        name: "web".to_string(),
        rules: vec![Rule::new(Direction::Ingress, "0.0.0.0/0", 22, 22, "tcp")],
        error_message: String::new(),
    }
}
