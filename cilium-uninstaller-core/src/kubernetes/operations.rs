use std::fmt::Debug;

use async_trait::async_trait;
use json_patch::Patch;
use k8s_openapi::{
    api::{
        apps::v1::DaemonSet,
        core::v1::{Namespace, Node, Pod},
    },
    serde::de::DeserializeOwned,
};
use kube::{
    api::{DeleteParams, ListParams, Patch as KubePatch, PatchParams},
    config::{KubeConfigOptions, Kubeconfig},
    Api, Client, Config,
};
use log::debug;

use crate::{helpers::pretty_type_name, patch::to_json_bytes, FIELD_MANAGER};

use super::{ClusterApi, ClusterError};

pub async fn create_local_client(
    config_path: &Option<String>,
    context_name: &Option<String>,
) -> anyhow::Result<Client> {
    let config_options = KubeConfigOptions {
        context: context_name.to_owned(),
        ..Default::default()
    };

    let config = match config_path {
        Some(path) => {
            let kubeconfig = Kubeconfig::read_from(path)?;
            Config::from_custom_kubeconfig(kubeconfig, &config_options).await?
        }
        None => Config::from_kubeconfig(&config_options).await?,
    };

    let client = Client::try_from(config)?;

    Ok(client)
}

/// Maps a kube error to a [`ClusterError`], singling out `404 Not Found` responses.
pub fn map_kube_error<T>(error: kube::Error, name: &str) -> ClusterError {
    let kind = pretty_type_name::<T>();

    match error {
        kube::Error::Api(response) if response.code == 404 => ClusterError::NotFound {
            kind,
            name: name.to_owned(),
        },
        source => ClusterError::KubeApiError {
            kind,
            name: name.to_owned(),
            source,
        },
    }
}

/// [`ClusterApi`] backed by a live kube client.
#[derive(Clone)]
pub struct KubeCluster {
    client: Client,
    dry_run: bool,
}

impl KubeCluster {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;

        self
    }

    fn delete_params(&self) -> DeleteParams {
        DeleteParams {
            dry_run: self.dry_run,
            ..Default::default()
        }
    }

    fn patch_params(&self) -> PatchParams {
        PatchParams {
            dry_run: self.dry_run,
            field_manager: Some(FIELD_MANAGER.to_owned()),
            ..Default::default()
        }
    }

    async fn json_patch<T>(&self, api: Api<T>, name: &str, patch: &Patch) -> Result<(), ClusterError>
    where
        T: Clone + DeserializeOwned + Debug,
    {
        if log::log_enabled!(log::Level::Debug) {
            if let Ok(payload) = to_json_bytes(patch) {
                debug!(
                    "Patching {} '{name}' with {}",
                    pretty_type_name::<T>(),
                    String::from_utf8_lossy(&payload)
                );
            }
        }

        api.patch(name, &self.patch_params(), &KubePatch::Json::<()>(patch.clone()))
            .await
            .map_err(|error| map_kube_error::<T>(error, name))?;

        Ok(())
    }
}

#[async_trait]
impl ClusterApi for KubeCluster {
    async fn delete_pod_collection(&self, namespace: &str) -> Result<(), ClusterError> {
        let pod_api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);

        pod_api
            .delete_collection(&self.delete_params(), &ListParams::default())
            .await
            .map_err(|error| map_kube_error::<Pod>(error, namespace))?;

        Ok(())
    }

    async fn delete_namespace(&self, name: &str) -> Result<(), ClusterError> {
        let namespace_api: Api<Namespace> = Api::all(self.client.clone());

        namespace_api
            .delete(name, &self.delete_params())
            .await
            .map_err(|error| map_kube_error::<Namespace>(error, name))?;

        Ok(())
    }

    async fn get_namespace(&self, name: &str) -> Result<Namespace, ClusterError> {
        let namespace_api: Api<Namespace> = Api::all(self.client.clone());

        namespace_api
            .get(name)
            .await
            .map_err(|error| map_kube_error::<Namespace>(error, name))
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, ClusterError> {
        let node_api: Api<Node> = Api::all(self.client.clone());
        let nodes = node_api
            .list(&ListParams::default())
            .await
            .map_err(|error| map_kube_error::<Node>(error, "*"))?;

        Ok(nodes.items)
    }

    async fn patch_node(&self, name: &str, patch: &Patch) -> Result<(), ClusterError> {
        let node_api: Api<Node> = Api::all(self.client.clone());

        self.json_patch(node_api, name, patch).await
    }

    async fn get_daemonset(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DaemonSet, ClusterError> {
        let daemonset_api: Api<DaemonSet> = Api::namespaced(self.client.clone(), namespace);

        daemonset_api
            .get(name)
            .await
            .map_err(|error| map_kube_error::<DaemonSet>(error, name))
    }

    async fn patch_daemonset(
        &self,
        namespace: &str,
        name: &str,
        patch: &Patch,
    ) -> Result<(), ClusterError> {
        let daemonset_api: Api<DaemonSet> = Api::namespaced(self.client.clone(), namespace);

        self.json_patch(daemonset_api, name, patch).await
    }
}
