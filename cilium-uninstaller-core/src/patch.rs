use json_patch::{Patch, PatchOperation, RemoveOperation};

pub const ANNOTATIONS_POINTER: &str = "/metadata/annotations";
pub const TEMPLATE_NODE_SELECTOR_POINTER: &str = "/spec/template/spec/nodeSelector";

/// Escapes a single JSON Pointer reference token (RFC 6901).
///
/// `~` has to be replaced before `/`, otherwise the `~` introduced by `~1`
/// would get escaped a second time.
pub fn escape_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Accumulates `remove` operations for keys living under a common pointer.
#[derive(Debug, Clone)]
pub struct RemovePatchBuilder {
    prefix: String,
    operations: Vec<PatchOperation>,
}

impl RemovePatchBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            operations: Vec::new(),
        }
    }

    pub fn remove(mut self, segment: &str) -> Self {
        self.operations.push(PatchOperation::Remove(RemoveOperation {
            path: format!("{}/{}", self.prefix, escape_pointer_segment(segment)),
        }));

        self
    }

    pub fn remove_all<'a>(self, segments: impl IntoIterator<Item = &'a str>) -> Self {
        segments
            .into_iter()
            .fold(self, |builder, segment| builder.remove(segment))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn build(self) -> Patch {
        Patch(self.operations)
    }
}

pub fn annotation_removal_patch<'a>(keys: impl IntoIterator<Item = &'a str>) -> Patch {
    RemovePatchBuilder::new(ANNOTATIONS_POINTER)
        .remove_all(keys)
        .build()
}

pub fn node_selector_removal_patch(key: &str) -> Patch {
    RemovePatchBuilder::new(TEMPLATE_NODE_SELECTOR_POINTER)
        .remove(key)
        .build()
}

pub fn to_json_bytes(patch: &Patch) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(patch)
}

#[cfg(test)]
pub fn removed_paths(patch: &Patch) -> Vec<&str> {
    patch
        .0
        .iter()
        .filter_map(|operation| match operation {
            PatchOperation::Remove(remove) => Some(remove.path.as_str()),
            _ => None,
        })
        .collect()
}
