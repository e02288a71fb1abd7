use linkdeck_core::db::open_db_in_memory;
use linkdeck_core::{
    share_intake, AppDraft, Confirmation, DashboardStore, KeyValueStore, MemoryKeyValueStore,
    Section, SectionRepository, ShareOutcome, ShareParams, SqliteKeyValueStore, MAIN_VIEW,
    SECTIONS_KEY, SHARED_LINKS_SECTION_TITLE,
};

fn stored(kv: &MemoryKeyValueStore) -> Vec<Section> {
    serde_json::from_str(&kv.raw(SECTIONS_KEY).unwrap()).unwrap()
}

fn params(title: Option<&str>, text: Option<&str>, url: Option<&str>) -> ShareParams {
    ShareParams {
        title: title.map(str::to_string),
        text: text.map(str::to_string),
        url: url.map(str::to_string),
    }
}

#[test]
fn nothing_shared_writes_nothing_and_redirects() {
    let kv = MemoryKeyValueStore::new();
    let repo = SectionRepository::new(kv.clone());

    let outcome = share_intake(&params(Some("Title"), Some("  "), None), &repo);

    assert_eq!(outcome, ShareOutcome::NothingShared);
    assert_eq!(outcome.redirect_target(), MAIN_VIEW);
    assert_eq!(kv.raw(SECTIONS_KEY), None);
}

#[test]
fn empty_store_gets_shared_links_section() {
    let kv = MemoryKeyValueStore::new();
    let repo = SectionRepository::new(kv.clone());

    let outcome = share_intake(&params(None, None, Some("https://x.org/post")), &repo);

    let ShareOutcome::Added { app, persisted } = outcome else {
        panic!("expected added outcome");
    };
    assert!(persisted);
    assert_eq!(app.name, "https://x.org/post");
    assert_eq!(app.url, "https://x.org/post");
    assert!(app.icon.is_empty());
    assert!(app.description.is_empty());

    let sections = stored(&kv);
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].title, SHARED_LINKS_SECTION_TITLE);
    assert_eq!(sections[0].apps, vec![app]);
}

#[test]
fn title_names_app_and_text_becomes_description() {
    let kv = MemoryKeyValueStore::new();
    let repo = SectionRepository::new(kv.clone());
    let mut store = DashboardStore::load(SectionRepository::new(kv.clone()));
    store.add_section("Later").unwrap();

    let outcome = share_intake(
        &params(
            Some("Great read"),
            Some("check this out"),
            Some("https://blog.example/a"),
        ),
        &repo,
    );

    let ShareOutcome::Added { app, .. } = outcome else {
        panic!("expected added outcome");
    };
    assert_eq!(app.name, "Great read");
    assert_eq!(app.description, "check this out");

    let sections = stored(&kv);
    assert_eq!(sections.last().unwrap().title, "Later");
    assert_eq!(sections.last().unwrap().apps.last(), Some(&app));
}

#[test]
fn text_carries_url_when_url_missing() {
    let kv = MemoryKeyValueStore::new();
    let repo = SectionRepository::new(kv.clone());

    let outcome = share_intake(
        &ShareParams::from_query("?text=https%3A%2F%2Fyoutu.be%2Fabc123"),
        &repo,
    );

    let ShareOutcome::Added { app, .. } = outcome else {
        panic!("expected added outcome");
    };
    assert_eq!(app.url, "https://youtu.be/abc123");
    assert_eq!(app.name, "https://youtu.be/abc123");
    assert!(app.description.is_empty());
}

#[test]
fn shared_app_id_is_unique_against_existing_ids() {
    let kv = MemoryKeyValueStore::new();
    let mut store = DashboardStore::load(SectionRepository::new(kv.clone()));
    let inbox = store.sections()[1].id;
    let existing = store
        .add_app(inbox, AppDraft::new("x", "https://x"))
        .unwrap();

    let outcome = share_intake(
        &params(None, None, Some("https://y")),
        &SectionRepository::new(kv.clone()),
    );

    let ShareOutcome::Added { app, .. } = outcome else {
        panic!("expected added outcome");
    };
    assert!(app.id > existing.id);
    assert_eq!(stored(&kv)[1].apps.len(), 2);
}

#[test]
fn unreadable_store_is_left_untouched() {
    let kv = MemoryKeyValueStore::new();
    kv.set(SECTIONS_KEY, "corrupt").unwrap();

    let outcome = share_intake(
        &params(None, None, Some("https://x")),
        &SectionRepository::new(kv.clone()),
    );

    assert!(matches!(outcome, ShareOutcome::StoreUnreadable(_)));
    assert_eq!(outcome.redirect_target(), MAIN_VIEW);
    assert_eq!(kv.raw(SECTIONS_KEY).as_deref(), Some("corrupt"));
}

#[test]
fn failed_read_is_left_untouched() {
    let kv = MemoryKeyValueStore::new();
    let mine = r#"[{"id":9,"title":"Mine","apps":[]}]"#;
    kv.set(SECTIONS_KEY, mine).unwrap();
    kv.set_reject_reads(true);

    let outcome = share_intake(
        &params(None, None, Some("https://x")),
        &SectionRepository::new(kv.clone()),
    );

    assert!(matches!(outcome, ShareOutcome::StoreUnreadable(_)));
    assert_eq!(kv.raw(SECTIONS_KEY).as_deref(), Some(mine));
}

#[test]
fn shared_app_skips_ids_of_deleted_apps() {
    let kv = MemoryKeyValueStore::new();
    let mut store = DashboardStore::load(SectionRepository::new(kv.clone()));
    store
        .import_snapshot(
            r#"[{"id":1,"title":"Inbox","apps":[{"id":9000000000000,"name":"x","url":"https://x"}]}]"#,
        )
        .unwrap();
    store
        .delete_app(9_000_000_000_000, Confirmation::Confirmed)
        .unwrap();

    let outcome = share_intake(
        &params(None, None, Some("https://y")),
        &SectionRepository::new(kv),
    );

    let ShareOutcome::Added { app, .. } = outcome else {
        panic!("expected added outcome");
    };
    assert!(app.id > 9_000_000_000_000);
}

#[test]
fn failed_write_still_reports_added() {
    let kv = MemoryKeyValueStore::new();
    kv.set_reject_writes(true);

    let outcome = share_intake(
        &params(None, None, Some("https://x")),
        &SectionRepository::new(kv.clone()),
    );

    assert!(matches!(
        outcome,
        ShareOutcome::Added {
            persisted: false,
            ..
        }
    ));
    assert_eq!(outcome.redirect_target(), MAIN_VIEW);
}

#[test]
fn main_instance_sees_shared_link_after_reload() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let store = DashboardStore::load(SectionRepository::new(kv));
    let apps_before = store.app_count();

    share_intake(
        &params(Some("Docs"), None, Some("https://docs.rs")),
        &SectionRepository::new(kv),
    );

    let reloaded = DashboardStore::load(SectionRepository::new(kv));
    assert_eq!(reloaded.app_count(), apps_before + 1);
    let last = reloaded.sections().last().unwrap().apps.last().unwrap();
    assert_eq!(last.name, "Docs");
    assert!(last.description.is_empty());
}
