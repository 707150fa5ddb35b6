use serde::{Deserialize, Serialize};

/// Tree shape shared by intermediate snapshots, the final scan result,
/// and the JSON export. Directory sizes are conservative: a directory's
/// `size` is at least the sum of its measured children.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub size: u64,
    #[serde(rename = "isDir")]
    pub is_dir: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn leaf(name: String, path: String, size: u64) -> Self {
        Self {
            name,
            path,
            size,
            is_dir: false,
            children: None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// High-frequency progress payload emitted while the scanner walks.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProgressPayload {
    pub current_path: String,
    pub items_processed: u64,
}

/// Everything the scanning engine can tell the visualization, as explicit
/// tagged variants validated at the producer boundary.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// One discovered path with a running counter. Drives the live tree.
    Progress(ProgressPayload),
    /// Partial authoritative snapshot with measured sizes.
    Intermediate(FileNode),
    /// Final authoritative tree.
    Completed(FileNode),
    /// Terminal failure for this scan; the message is user-facing.
    Failed(String),
}
