use super::*;
use crate::error::ErrorKind;
use crate::web::MemoryStorage;

fn setup() -> (MemoryStorage, CartStore<MemoryStorage>) {
    let store = MemoryStorage::new();
    (store.clone(), CartStore::new(store))
}

#[test]
fn alice_add_twice_then_remove() {
    let (_, cart) = setup();
    assert!(cart.list("alice").is_empty());

    assert_eq!(cart.add("alice", "course-123").unwrap(), AddOutcome::Added);
    assert_eq!(cart.list("alice"), vec!["course-123"]);

    assert_eq!(
        cart.add("alice", "course-123").unwrap(),
        AddOutcome::AlreadyInCart
    );
    assert_eq!(cart.list("alice"), vec!["course-123"]);

    assert_eq!(cart.remove("alice", 0).unwrap().as_deref(), Some("course-123"));
    assert!(cart.list("alice").is_empty());
}

#[test]
fn stored_as_json_list_under_user_key() {
    let (store, cart) = setup();
    cart.add("alice", "a").unwrap();
    cart.add("alice", "b").unwrap();
    assert_eq!(store.get("cart_alice").as_deref(), Some(r#"["a","b"]"#));
}

#[test]
fn remove_only_touches_the_given_position() {
    let (_, cart) = setup();
    for id in ["a", "b", "c"] {
        cart.add("alice", id).unwrap();
    }
    assert_eq!(cart.remove("alice", 1).unwrap().as_deref(), Some("b"));
    assert_eq!(cart.list("alice"), vec!["a", "c"]);
}

#[test]
fn remove_out_of_range_is_a_noop() {
    let (store, cart) = setup();
    cart.add("alice", "a").unwrap();
    store.fail_writes(true);
    // 越界不写入，因此写失败也不会暴露
    assert_eq!(cart.remove("alice", 5).unwrap(), None);
    assert_eq!(cart.list("alice"), vec!["a"]);
}

#[test]
fn users_are_partitioned() {
    let (store, cart) = setup();
    cart.add("alice", "a").unwrap();
    cart.add("bob", "b").unwrap();
    cart.remove("bob", 0).unwrap();

    assert_eq!(cart.list("alice"), vec!["a"]);
    assert!(cart.list("bob").is_empty());
    assert!(cart.contains("alice", "a"));
    assert!(!cart.contains("bob", "a"));
    assert_eq!(store.keys(), vec!["cart_alice", "cart_bob"]);
}

#[test]
fn malformed_storage_reads_as_empty() {
    let (store, cart) = setup();
    store.set("cart_alice", "{not json");
    assert!(cart.list("alice").is_empty());

    // 下一次写入覆盖损坏的内容
    cart.add("alice", "a").unwrap();
    assert_eq!(cart.list("alice"), vec!["a"]);
}

#[test]
fn write_failure_surfaces_as_storage_error() {
    let (store, cart) = setup();
    store.fail_writes(true);
    let err = cart.add("alice", "a").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(cart.list("alice").is_empty());
}

#[test]
fn clear_removes_everything() {
    let (_, cart) = setup();
    cart.add("alice", "a").unwrap();
    cart.add("alice", "b").unwrap();
    assert_eq!(cart.len("alice"), 2);
    cart.clear("alice").unwrap();
    assert_eq!(cart.len("alice"), 0);
}

#[test]
fn notices() {
    assert_eq!(AddOutcome::Added.notice(), "Course added to cart!");
    assert_eq!(
        AddOutcome::AlreadyInCart.notice(),
        "This course is already in your cart."
    );
}

#[test]
fn remove_expected_skips_a_shifted_position() {
    let (_, cart) = setup();
    for id in ["retired", "c1", "c2"] {
        cart.add("alice", id).unwrap();
    }
    // 第 0 行展示的是 c1，但存储中第 0 位是 retired
    assert_eq!(cart.remove_expected("alice", 0, "c1").unwrap(), None);
    assert_eq!(cart.list("alice"), vec!["retired", "c1", "c2"]);

    assert_eq!(
        cart.remove_expected("alice", 1, "c1").unwrap().as_deref(),
        Some("c1")
    );
    assert_eq!(cart.list("alice"), vec!["retired", "c2"]);
    assert_eq!(cart.remove_expected("alice", 9, "c2").unwrap(), None);
}

#[test]
fn details_pair_with_ids_only_when_lengths_match() {
    let ids: Vec<String> = vec!["c1".into(), "c2".into()];
    assert_eq!(
        pair_with_ids(&ids, vec!["Course c1", "Course c2"]),
        Some(vec![("c1".to_string(), "Course c1"), ("c2".to_string(), "Course c2")])
    );

    // 服务端丢弃了已下架的课程
    let stored: Vec<String> = vec!["retired".into(), "c1".into(), "c2".into()];
    assert_eq!(pair_with_ids(&stored, vec!["Course c1", "Course c2"]), None);
    assert_eq!(pair_with_ids::<&str>(&[], Vec::new()), Some(Vec::new()));
}

#[test]
fn context_bumps_revision_only_on_change() {
    let store = MemoryStorage::new();
    let ctx = CartContext::with_store(store.clone());
    let revision = || ctx.revision.get_untracked();

    assert_eq!(ctx.add("alice", "a").unwrap(), AddOutcome::Added);
    assert_eq!(revision(), 1);
    assert_eq!(ctx.add("alice", "a").unwrap(), AddOutcome::AlreadyInCart);
    assert_eq!(revision(), 1);

    assert_eq!(ctx.remove("alice", 5).unwrap(), None);
    assert_eq!(revision(), 1);
    assert_eq!(ctx.remove("alice", 0).unwrap().as_deref(), Some("a"));
    assert_eq!(revision(), 2);

    ctx.add("alice", "b").unwrap();
    assert_eq!(ctx.remove_expected("alice", 0, "x").unwrap(), None);
    assert_eq!(revision(), 3);
    assert_eq!(ctx.count("alice"), 1);

    // 写入失败不递增
    store.fail_writes(true);
    assert!(ctx.add("alice", "c").is_err());
    assert_eq!(revision(), 3);
}

#[test]
fn generation_keeps_only_the_latest_ticket() {
    let owner = Owner::new();
    let generation = owner.with(RequestGeneration::new);

    let first = generation.next().unwrap();
    let second = generation.next().unwrap();
    assert!(!generation.is_current(first));
    assert!(generation.is_current(second));
}

#[test]
fn generation_after_page_disposed_discards_results() {
    let owner = Owner::new();
    let generation = owner.with(RequestGeneration::new);
    let ticket = generation.next().unwrap();

    owner.cleanup();
    drop(owner);

    // 请求在页面销毁后返回：检查失败而不是 panic
    assert!(!generation.is_current(ticket));
    assert_eq!(generation.next(), None);
}
