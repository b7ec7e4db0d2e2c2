use std::sync::Arc;

use bson::doc;
use pcm_catalog::ProjectionConfig;
use pcm_service::{TaxonomyMasterQuery, TaxonomyQuery, TaxonomyService};
use pcm_store::MemoryStore;

fn service() -> (Arc<MemoryStore>, TaxonomyService<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = TaxonomyService::new(store.clone(), Arc::new(ProjectionConfig::new()));
    (store, service)
}

fn seed(store: &MemoryStore) {
    store.seed_taxonomy(vec![
        doc! {
            "_id": "t-1",
            "type": "subject",
            "assetType": "book",
            "code": "510",
            "level": 1_i32,
            "name": "Mathematics",
            "parentId": bson::Bson::Null,
            "status": "active",
        },
        doc! {
            "_id": "t-2",
            "type": "subject",
            "assetType": "book",
            "code": "5101",
            "level": 2_i32,
            "name": "Algebra",
            "parentId": "t-1",
            "status": "active",
        },
        doc! {
            "_id": "t-3",
            "type": "subject",
            "assetType": "book",
            "code": "520",
            "level": 1_i32,
            "name": "Astronomy",
            "parentId": bson::Bson::Null,
            "status": "inactive",
        },
        // ubx classifications live in this tree, not the master tree
        doc! {
            "_id": 7_i64,
            "type": "ubx",
            "code": "U1",
            "level": 1_i32,
            "name": "Ubx Root",
            "parentId": bson::Bson::Null,
            "status": "active",
        },
        doc! {
            "_id": 8_i64,
            "type": "ubx",
            "code": "U12",
            "level": 2_i32,
            "name": "Ubx Child",
            "parentId": 7_i64,
            "status": "active",
        },
    ]);
    store.seed_taxonomy_master(vec![
        doc! {
            "_id": "m-1",
            "classificationFamily": "rom",
            "classificationType": "discipline",
            "code": "A",
            "level": 1_i32,
            "name": "Arts",
            "parentId": bson::Bson::Null,
            "status": "active",
        },
        doc! {
            "_id": "m-2",
            "classificationFamily": "rom",
            "classificationType": "discipline",
            "code": "A01",
            "level": 2_i32,
            "name": "Painting",
            "parentId": "m-1",
            "status": "active",
        },
        // a decoy: master records claiming the ubx family must never match
        doc! {
            "_id": "m-ubx",
            "classificationFamily": "ubx",
            "code": "U1",
            "level": 1_i32,
            "name": "Master Decoy",
            "status": "active",
        },
    ]);
}

// ── general tree ────────────────────────────────────────────────────

#[test]
fn inactive_records_filtered_out() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find(&TaxonomyQuery {
            asset_type: Some("book".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.name.as_deref() != Some("Astronomy")));
}

#[test]
fn code_prefix_with_extended_level() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find(&TaxonomyQuery {
            code: Some("510".into()),
            is_code_prefix: true,
            level: Some(1),
            extend_level: true,
            ..Default::default()
        })
        .unwrap();
    let mut codes: Vec<_> = nodes.iter().filter_map(|n| n.code.clone()).collect();
    codes.sort();
    assert_eq!(codes, vec!["510", "5101"]);
}

#[test]
fn exact_code_without_prefix_flag() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find(&TaxonomyQuery {
            code: Some("510".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name.as_deref(), Some("Mathematics"));
}

// ── master tree ─────────────────────────────────────────────────────

#[test]
fn master_family_and_children() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find_master(&TaxonomyMasterQuery {
            classification_family: "rom".into(),
            code: Some("A".into()),
            include_children: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.classification_type.as_deref() == Some("discipline")));
}

#[test]
fn master_exact_code_only() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find_master(&TaxonomyMasterQuery {
            classification_family: "rom".into(),
            code: Some("A".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name.as_deref(), Some("Arts"));
}

// ── ubx rerouting ───────────────────────────────────────────────────

#[test]
fn ubx_master_query_reads_the_general_tree() {
    // family ubx never touches the master collection
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find_master(&TaxonomyMasterQuery {
            classification_family: "ubx".into(),
            code: Some("U1".into()),
            include_children: true,
            ..Default::default()
        })
        .unwrap();

    // prefix match on the general tree: U1 and U12, never the master decoy
    let mut names: Vec<_> = nodes.iter().filter_map(|n| n.name.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["Ubx Child", "Ubx Root"]);

    // numeric ids from the general tree are coerced to strings
    assert!(nodes.iter().any(|n| n.id == "7"));
    assert!(nodes.iter().any(|n| n.parent_id.as_deref() == Some("7")));
}

#[test]
fn ubx_exact_code_without_level_or_children() {
    let (store, service) = service();
    seed(&store);

    let nodes = service
        .find_master(&TaxonomyMasterQuery {
            classification_family: "ubx".into(),
            code: Some("U1".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].name.as_deref(), Some("Ubx Root"));
}
