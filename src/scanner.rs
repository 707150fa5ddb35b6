use dashmap::DashMap;
use jwalk::WalkDir;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::wire::{FileNode, ProgressPayload, ScanEvent};

const PROGRESS_EMIT_INTERVAL_MS: u64 = 100;
const INTERMEDIATE_EMIT_INTERVAL_MS: u64 = 1000;

/// Intermediate snapshots are bounded: this many children per level, two
/// levels deep. The final tree is full-depth and unbounded.
const PREVIEW_TOP_LIMIT: usize = 40;

/// A running scan. Owns the event channel and the cancellation flag; the
/// handle is the subscription, and dropping it cancels the scan, so every
/// exit path of the owner releases the producer.
pub struct ScanHandle {
    rx: Receiver<ScanEvent>,
    cancel: Arc<AtomicBool>,
}

impl ScanHandle {
    /// Non-blocking poll for the next event. `None` once the channel is
    /// empty or the scan thread has gone away.
    pub fn try_next(&self) -> Option<ScanEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn events(&self) -> &Receiver<ScanEvent> {
        &self.rx
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Spawn a background scan of `root` and return its subscription handle.
pub fn start_scan<P: Into<PathBuf>>(root: P) -> ScanHandle {
    let root = root.into();
    let (tx, rx) = mpsc::channel::<ScanEvent>();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = cancel.clone();

    thread::spawn(move || {
        if let Err(message) = scan_root(&root, &tx, &flag) {
            // A cancelled scan exits silently; the owner tore down first.
            if !flag.load(Ordering::Relaxed) {
                let _ = tx.send(ScanEvent::Failed(message));
            }
        }
    });

    ScanHandle { rx, cancel }
}

fn processing_parallelism() -> usize {
    let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
    (cores * 2).clamp(4, 64)
}

fn scan_root(root: &Path, tx: &Sender<ScanEvent>, cancel: &AtomicBool) -> Result<(), String> {
    let metadata = std::fs::metadata(root)
        .map_err(|e| format!("Cannot read {}: {}", root.display(), e))?;

    if !metadata.is_dir() {
        let _ = tx.send(ScanEvent::Completed(FileNode::leaf(
            display_name(root),
            root.to_string_lossy().to_string(),
            metadata.len(),
        )));
        return Ok(());
    }

    let scan_threads = processing_parallelism();

    // Phase 1: discovery walk. Every discovered path goes out as a
    // progress event, throttled to the emit interval.
    let mut entries = Vec::new();
    let mut discovered = 0u64;
    let mut last_emit = Instant::now();

    let walker = WalkDir::new(root)
        .skip_hidden(false)
        .parallelism(jwalk::Parallelism::RayonNewPool(scan_threads))
        .into_iter();

    for entry in walker {
        if cancel.load(Ordering::Relaxed) {
            return Err("scan cancelled".to_string());
        }
        let Ok(entry) = entry else { continue };
        discovered += 1;

        if last_emit.elapsed().as_millis() as u64 >= PROGRESS_EMIT_INTERVAL_MS {
            last_emit = Instant::now();
            let _ = tx.send(ScanEvent::Progress(ProgressPayload {
                current_path: entry.path().to_string_lossy().to_string(),
                items_processed: discovered,
            }));
        }
        entries.push(entry);
    }

    let _ = tx.send(ScanEvent::Progress(ProgressPayload {
        current_path: root.to_string_lossy().to_string(),
        items_processed: discovered,
    }));

    // Phase 2: measure sizes in parallel, emitting bounded intermediate
    // snapshots while the pass runs.
    let sizes: DashMap<PathBuf, (u64, bool)> = DashMap::new();
    let processed = AtomicU64::new(0);
    let last_progress_ms = AtomicU64::new(0);
    let last_intermediate_ms = AtomicU64::new(0);
    let started = Instant::now();
    let total = entries.len() as u64;

    let measure = || {
        entries
            .par_iter()
            .filter_map(|entry| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let path = entry.path();
                let metadata = entry.metadata().ok()?;
                let size = metadata.len();
                let is_dir = metadata.is_dir();

                sizes.insert(path.clone(), (size, is_dir));
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;

                let elapsed_ms = started.elapsed().as_millis() as u64;
                if done == total
                    || claim_interval(&last_progress_ms, elapsed_ms, PROGRESS_EMIT_INTERVAL_MS)
                {
                    let _ = tx.send(ScanEvent::Progress(ProgressPayload {
                        current_path: path.to_string_lossy().to_string(),
                        items_processed: discovered + done,
                    }));
                }

                if sizes.len() > 10
                    && claim_interval(
                        &last_intermediate_ms,
                        elapsed_ms,
                        INTERMEDIATE_EMIT_INTERVAL_MS,
                    )
                {
                    let _ = tx.send(ScanEvent::Intermediate(assemble_preview(root, &sizes)));
                }

                Some((path, size, is_dir))
            })
            .collect::<Vec<_>>()
    };

    let items = ThreadPoolBuilder::new()
        .num_threads(scan_threads)
        .build()
        .map(|pool| pool.install(measure))
        .unwrap_or_else(|_| measure());

    if cancel.load(Ordering::Relaxed) {
        return Err("scan cancelled".to_string());
    }

    let _ = tx.send(ScanEvent::Completed(assemble_tree(root, &items)));
    Ok(())
}

/// Claim one emission slot per interval across threads; the CAS loser
/// skips its emission instead of blocking.
fn claim_interval(last_ms: &AtomicU64, elapsed_ms: u64, interval_ms: u64) -> bool {
    let previous = last_ms.load(Ordering::Relaxed);
    if elapsed_ms.saturating_sub(previous) < interval_ms {
        return false;
    }
    last_ms
        .compare_exchange(previous, elapsed_ms, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Two-level snapshot of the sizes measured so far. File sizes roll up
/// into their first- and second-level ancestors; each level keeps only the
/// largest entries.
fn assemble_preview(root: &Path, sizes: &DashMap<PathBuf, (u64, bool)>) -> FileNode {
    struct Bucket {
        size: u64,
        is_dir: bool,
        sub: HashMap<String, (u64, bool)>,
    }

    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    let mut root_total = 0u64;

    for entry in sizes.iter() {
        let (size, is_dir) = *entry.value();
        if is_dir {
            continue;
        }
        let Ok(rel) = entry.key().strip_prefix(root) else {
            continue;
        };
        let mut components = rel.components();
        let Some(first) = components.next() else {
            continue;
        };
        root_total += size;

        let first_name = first.as_os_str().to_string_lossy().to_string();
        let second = components.next();
        let bucket = buckets.entry(first_name).or_insert_with(|| Bucket {
            size: 0,
            is_dir: false,
            sub: HashMap::new(),
        });
        bucket.size += size;

        if let Some(second) = second {
            bucket.is_dir = true;
            let second_name = second.as_os_str().to_string_lossy().to_string();
            let deeper = components.next().is_some();
            let slot = bucket.sub.entry(second_name).or_insert((0, false));
            slot.0 += size;
            slot.1 |= deeper;
        }
    }

    let mut children: Vec<FileNode> = buckets
        .into_iter()
        .map(|(name, bucket)| {
            let path = root.join(&name);
            let sub_children = if bucket.sub.is_empty() {
                None
            } else {
                let mut sub: Vec<FileNode> = bucket
                    .sub
                    .into_iter()
                    .map(|(sub_name, (size, is_dir))| FileNode {
                        name: sub_name.clone(),
                        path: path.join(&sub_name).to_string_lossy().to_string(),
                        size,
                        is_dir,
                        children: None,
                    })
                    .collect();
                sub.sort_by(|a, b| b.size.cmp(&a.size));
                sub.truncate(PREVIEW_TOP_LIMIT);
                Some(sub)
            };

            FileNode {
                name,
                path: path.to_string_lossy().to_string(),
                size: bucket.size,
                is_dir: bucket.is_dir,
                children: sub_children,
            }
        })
        .collect();

    children.sort_by(|a, b| b.size.cmp(&a.size));
    children.truncate(PREVIEW_TOP_LIMIT);

    FileNode {
        name: display_name(root),
        path: root.to_string_lossy().to_string(),
        size: root_total,
        is_dir: true,
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    }
}

/// Full-depth authoritative tree. Directory sizes are the sum of their
/// children's, so a parent is never smaller than its measured contents.
fn assemble_tree(root: &Path, items: &[(PathBuf, u64, bool)]) -> FileNode {
    let mut children_of: HashMap<&Path, Vec<usize>> = HashMap::new();
    for (i, (path, _, _)) in items.iter().enumerate() {
        if path == root {
            continue;
        }
        if let Some(parent) = path.parent() {
            children_of.entry(parent).or_default().push(i);
        }
    }

    build_node(root, items, &children_of)
}

fn build_node(
    path: &Path,
    items: &[(PathBuf, u64, bool)],
    children_of: &HashMap<&Path, Vec<usize>>,
) -> FileNode {
    let mut children: Vec<FileNode> = children_of
        .get(path)
        .map(|ids| {
            ids.iter()
                .map(|&i| {
                    let (child_path, size, is_dir) = &items[i];
                    if *is_dir {
                        build_node(child_path, items, children_of)
                    } else {
                        FileNode::leaf(
                            display_name(child_path),
                            child_path.to_string_lossy().to_string(),
                            *size,
                        )
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    children.sort_by(|a, b| b.size.cmp(&a.size));
    let size: u64 = children.iter().map(|c| c.size).sum();

    FileNode {
        name: display_name(path),
        path: path.to_string_lossy().to_string(),
        size,
        is_dir: true,
        children: if children.is_empty() {
            None
        } else {
            Some(children)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;

    fn write_file(path: &Path, bytes: usize) {
        fs::write(path, vec![0u8; bytes]).unwrap();
    }

    fn drain(handle: &ScanHandle) -> Vec<ScanEvent> {
        let mut events = Vec::new();
        loop {
            match handle.events().recv_timeout(Duration::from_secs(20)) {
                Ok(event) => {
                    let terminal = matches!(
                        event,
                        ScanEvent::Completed(_) | ScanEvent::Failed(_)
                    );
                    events.push(event);
                    if terminal {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
        events
    }

    #[test]
    fn test_scan_builds_authoritative_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        write_file(&root.join("a/one.bin"), 3000);
        write_file(&root.join("a/b/two.bin"), 1000);
        write_file(&root.join("c.bin"), 2000);

        let handle = start_scan(root);
        let events = drain(&handle);

        let tree = events
            .iter()
            .find_map(|e| match e {
                ScanEvent::Completed(node) => Some(node),
                _ => None,
            })
            .expect("scan did not complete");

        assert_eq!(tree.size, 6000);
        assert!(tree.is_dir);

        let children = tree.children.as_ref().unwrap();
        // Sorted by size descending: a (4000) before c.bin (2000).
        assert_eq!(children[0].name, "a");
        assert!(children[0].is_dir);
        assert_eq!(children[0].size, 4000);
        assert_eq!(children[1].name, "c.bin");
        assert_eq!(children[1].size, 2000);

        let a_children = children[0].children.as_ref().unwrap();
        assert_eq!(a_children[0].name, "one.bin");
        let b = a_children.iter().find(|c| c.name == "b").unwrap();
        assert_eq!(b.size, 1000);
    }

    #[test]
    fn test_scan_emits_progress() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..30 {
            write_file(&dir.path().join(format!("f{i}.bin")), 10);
        }

        let handle = start_scan(dir.path());
        let events = drain(&handle);
        assert!(events
            .iter()
            .any(|e| matches!(e, ScanEvent::Progress(p) if p.items_processed > 0)));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("no-such-dir");

        let handle = start_scan(&gone);
        let events = drain(&handle);
        assert!(matches!(events.last(), Some(ScanEvent::Failed(_))));
    }

    #[test]
    fn test_cancel_suppresses_failure_event() {
        let dir = tempfile::tempdir().unwrap();
        write_file(&dir.path().join("f.bin"), 10);

        let handle = start_scan(dir.path());
        handle.cancel();
        assert!(handle.is_cancelled());

        // The scan either finished before the flag landed or exited
        // silently; a cancellation is never reported as a failure.
        let events = drain(&handle);
        assert!(!events.iter().any(|e| matches!(e, ScanEvent::Failed(_))));
    }

    #[test]
    fn test_single_file_root_completes_as_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("solo.bin");
        write_file(&file, 512);

        let handle = start_scan(&file);
        let events = drain(&handle);
        match events.last() {
            Some(ScanEvent::Completed(node)) => {
                assert!(!node.is_dir);
                assert_eq!(node.size, 512);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }
}
