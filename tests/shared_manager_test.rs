mod common;

use common::ScriptedBackend;
use document_analysis::{init_shared, shared_manager, AnalysisManager, Config};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn test_concurrent_first_access_creates_one_instance() {
    assert!(shared_manager().is_none());

    let created = Arc::new(AtomicUsize::new(0));
    let threads: Vec<_> = (0..8)
        .map(|_| {
            let created = created.clone();
            std::thread::spawn(move || {
                let manager = init_shared(|| {
                    created.fetch_add(1, Ordering::SeqCst);
                    AnalysisManager::new(Arc::new(ScriptedBackend::new()), &Config::default())
                });
                manager as *const AnalysisManager as usize
            })
        })
        .collect();

    let addresses: Vec<usize> = threads.into_iter().map(|t| t.join().unwrap()).collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));

    let shared = shared_manager().expect("共享管理器应已创建");
    assert_eq!(shared as *const AnalysisManager as usize, addresses[0]);
    assert!(shared.result().is_none() && shared.error().is_none() && shared.document().is_none());
}
