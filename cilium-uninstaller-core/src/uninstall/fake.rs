use std::{
    collections::{BTreeMap, HashSet, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use json_patch::Patch;
use k8s_openapi::api::{
    apps::v1::{DaemonSet, DaemonSetSpec},
    core::v1::{Namespace, Node, Pod, PodSpec, PodTemplateSpec},
};
use kube::core::{ErrorResponse, ObjectMeta};

use crate::{
    kubernetes::{operations::map_kube_error, ClusterApi, ClusterError},
    patch::removed_paths,
    release::{ReleaseError, ReleaseManager, ReleaseUninstallRequest},
    AWS_NODE_DAEMONSET_NODE_SELECTOR_KEY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DeletePods(String),
    DeleteNamespace(String),
    GetNamespace(String),
    ListNodes,
    PatchNode(String, Vec<String>),
    GetDaemonSet(String, String),
    PatchDaemonSet(String, String, Vec<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Present,
    Missing,
    Failing,
}

/// Scripted in-memory cluster recording every call it receives.
pub struct FakeCluster {
    calls: Mutex<Vec<Call>>,
    namespace_lookups: Mutex<VecDeque<Lookup>>,
    namespace_stuck: bool,
    test_namespace: Lookup,
    pods: Lookup,
    nodes: Option<Vec<Node>>,
    failing_nodes: HashSet<String>,
    daemonset: Lookup,
    daemonset_patch_fails: bool,
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            namespace_lookups: Mutex::new(VecDeque::new()),
            namespace_stuck: false,
            test_namespace: Lookup::Present,
            pods: Lookup::Present,
            nodes: Some(Vec::new()),
            failing_nodes: HashSet::new(),
            daemonset: Lookup::Missing,
            daemonset_patch_fails: false,
        }
    }
}

impl FakeCluster {
    pub fn with_namespace_lookups(self, lookups: impl IntoIterator<Item = Lookup>) -> Self {
        *self.namespace_lookups.lock().unwrap() = lookups.into_iter().collect();

        self
    }

    pub fn with_namespace_stuck(mut self) -> Self {
        self.namespace_stuck = true;

        self
    }

    pub fn without_test_namespace(mut self) -> Self {
        self.test_namespace = Lookup::Missing;
        self.pods = Lookup::Missing;

        self
    }

    pub fn with_failing_pod_deletion(mut self) -> Self {
        self.pods = Lookup::Failing;

        self
    }

    pub fn with_failing_namespace_deletion(mut self) -> Self {
        self.test_namespace = Lookup::Failing;

        self
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = Some(nodes);

        self
    }

    pub fn with_failing_node_listing(mut self) -> Self {
        self.nodes = None;

        self
    }

    pub fn with_failing_node(mut self, name: &str) -> Self {
        self.failing_nodes.insert(name.to_owned());

        self
    }

    pub fn with_daemonset(mut self, lookup: Lookup) -> Self {
        self.daemonset = lookup;

        self
    }

    pub fn with_failing_daemonset_patch(mut self) -> Self {
        self.daemonset_patch_fails = true;

        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| predicate(call)).count()
    }

    pub fn patched_nodes(&self) -> BTreeMap<String, Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                Call::PatchNode(name, paths) => Some((name.to_owned(), paths.to_owned())),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn node(name: &str, annotations: &[(&str, &str)]) -> Node {
    Node {
        metadata: ObjectMeta {
            name: Some(name.to_owned()),
            annotations: Some(
                annotations
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn forbidden<T>(name: &str) -> ClusterError {
    map_kube_error::<T>(
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: "forbidden".to_owned(),
            reason: "Forbidden".to_owned(),
            code: 403,
        }),
        name,
    )
}

fn not_found<T>(name: &str) -> ClusterError {
    map_kube_error::<T>(
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_owned(),
            message: "not found".to_owned(),
            reason: "NotFound".to_owned(),
            code: 404,
        }),
        name,
    )
}

fn respond<T, V, F>(lookup: Lookup, name: &str, value: F) -> Result<V, ClusterError>
where
    F: FnOnce() -> V,
{
    match lookup {
        Lookup::Present => Ok(value()),
        Lookup::Missing => Err(not_found::<T>(name)),
        Lookup::Failing => Err(forbidden::<T>(name)),
    }
}

fn paths(patch: &Patch) -> Vec<String> {
    removed_paths(patch).into_iter().map(str::to_owned).collect()
}

#[async_trait]
impl ClusterApi for FakeCluster {
    async fn delete_pod_collection(&self, namespace: &str) -> Result<(), ClusterError> {
        self.record(Call::DeletePods(namespace.to_owned()));

        respond::<Pod, _, _>(self.pods, namespace, || ())
    }

    async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError> {
        self.record(Call::DeleteNamespace(name.to_owned()));

        respond::<Namespace, _, _>(self.test_namespace, name, || ())
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError> {
        self.record(Call::GetNamespace(name.to_owned()));

        let lookup = match self.namespace_lookups.lock().unwrap().pop_front() {
            Some(lookup) => lookup,
            None if self.namespace_stuck => Lookup::Present,
            None => Lookup::Missing,
        };

        respond::<Namespace, _, _>(lookup, name, Namespace::default)
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        self.record(Call::ListNodes);

        self.nodes.clone().ok_or_else(|| forbidden::<Node>("*"))
    }

    async fn patch_node(&self, name: &str, patch: &Patch) -> Result<(), ClusterError> {
        self.record(Call::PatchNode(name.to_owned(), paths(patch)));

        if self.failing_nodes.contains(name) {
            return Err(forbidden::<Node>(name));
        }

        Ok(())
    }

    async fn get_daemonset(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DaemonSet, ClusterError> {
        self.record(Call::GetDaemonSet(namespace.to_owned(), name.to_owned()));

        let selector = BTreeMap::from([(
            AWS_NODE_DAEMONSET_NODE_SELECTOR_KEY.to_owned(),
            "true".to_owned(),
        )]);

        respond::<DaemonSet, _, _>(self.daemonset, name, || DaemonSet {
            spec: Some(DaemonSetSpec {
                template: PodTemplateSpec {
                    spec: Some(PodSpec {
                        node_selector: Some(selector),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    async fn patch_daemonset(
        &self,
        namespace: &str,
        name: &str,
        patch: &Patch,
    ) -> Result<(), ClusterError> {
        self.record(Call::PatchDaemonSet(
            namespace.to_owned(),
            name.to_owned(),
            paths(patch),
        ));

        if self.daemonset_patch_fails {
            return Err(forbidden::<DaemonSet>(name));
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct FakeReleaseManager {
    requests: Mutex<Vec<ReleaseUninstallRequest>>,
    fails: bool,
}

impl FakeReleaseManager {
    pub fn failing() -> Self {
        Self {
            fails: true,
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<ReleaseUninstallRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseManager for FakeReleaseManager {
    async fn uninstall(&self, request: &ReleaseUninstallRequest) -> Result<(), ReleaseError> {
        self.requests.lock().unwrap().push(request.clone());

        if self.fails {
            return Err(ReleaseError::Failed {
                release: request.release_name.to_owned(),
                status: "exit status: 1".to_owned(),
                stderr: "Error: uninstall: Release not loaded: cilium: release: not found"
                    .to_owned(),
            });
        }

        Ok(())
    }
}
