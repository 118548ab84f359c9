
use portfolio_site::{
    db::memory::MemoryStore,
    entities::{
        contact_message::ContactMessage,
        project::Project,
        resume_item::{ResumeItem, ResumeItemType},
        skill::{Skill, SkillCategory},
    },
    errors::AppError,
    repositories::{store::Session, unit_of_work::TransactionState},
};
use test_utils::*;

#[tokio::test]
async fn commit_and_rollback_while_idle_are_no_ops() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    assert_eq!(uow.transaction_state(), TransactionState::Idle);
    uow.commit().await.unwrap();
    uow.rollback().await.unwrap();
    assert_eq!(uow.transaction_state(), TransactionState::Idle);
}

#[tokio::test]
async fn begin_moves_to_open_and_commit_back_to_idle() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.begin_transaction().await.unwrap();
    assert_eq!(uow.transaction_state(), TransactionState::Open);

    uow.commit().await.unwrap();
    assert_eq!(uow.transaction_state(), TransactionState::Idle);
}

#[tokio::test]
async fn nested_begin_is_rejected() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.begin_transaction().await.unwrap();
    let second = uow.begin_transaction().await;

    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert_eq!(uow.transaction_state(), TransactionState::Open);
}

#[tokio::test]
async fn save_changes_counts_affected_records_across_repositories() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.projects().add(project("One")).unwrap();
    uow.projects().add(project("Two")).unwrap();
    uow.skills().add(skill("Rust", SkillCategory::Languages, 1)).unwrap();
    uow.resume_items()
        .add(resume_item("Engineer", ResumeItemType::Experience, 1, date(2020, 1, 1)))
        .unwrap();

    assert!(uow.has_changes());
    assert_eq!(uow.save_changes().await.unwrap(), 4);
    assert!(!uow.has_changes());
    assert_eq!(uow.save_changes().await.unwrap(), 0);

    assert_eq!(store.row_count::<Project>(), 2);
    assert_eq!(store.row_count::<Skill>(), 1);
    assert_eq!(store.row_count::<ResumeItem>(), 1);
}

#[tokio::test]
async fn rollback_discards_saved_changes_inside_the_transaction() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.begin_transaction().await.unwrap();
    let added = uow.projects().add(project("Rolled back")).unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 1);

    // Not visible outside the transaction yet.
    assert_eq!(store.row_count::<Project>(), 0);

    uow.rollback().await.unwrap();
    assert_eq!(store.row_count::<Project>(), 0);
    assert_eq!(uow.transaction_state(), TransactionState::Idle);

    // The same unit of work no longer sees the rolled back row.
    assert!(uow.projects().get_by_id(added.meta.id).await.unwrap().is_none());
    assert!(uow.projects().get_all().await.unwrap().is_empty());
    assert!(!uow.has_changes());
}

#[tokio::test]
async fn rollback_restores_the_stored_version_of_an_edited_row() {
    let store = MemoryStore::new();
    let mut first = memory_uow(&store).await;
    let original = first.projects().add(project("Original")).unwrap();
    first.save_changes().await.unwrap();

    let mut uow = memory_uow(&store).await;
    uow.begin_transaction().await.unwrap();
    let mut loaded = uow.projects().get_by_id(original.meta.id).await.unwrap().unwrap();
    loaded.title = "Edited".to_string();
    uow.projects().update(loaded).unwrap();
    uow.save_changes().await.unwrap();
    uow.rollback().await.unwrap();

    let reloaded = uow.projects().get_by_id(original.meta.id).await.unwrap().unwrap();
    assert_eq!(reloaded.title, "Original");
}

#[tokio::test]
async fn commit_publishes_changes_saved_inside_the_transaction() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.begin_transaction().await.unwrap();
    let added = uow.projects().add(project("Committed")).unwrap();
    uow.save_changes().await.unwrap();

    // The transaction sees its own writes.
    assert!(uow.projects().get_by_id(added.meta.id).await.unwrap().is_some());

    uow.commit().await.unwrap();
    assert!(store.raw_row::<Project>(added.meta.id).is_some());
}

#[tokio::test]
async fn dispose_rolls_back_and_is_idempotent() {
    let store = MemoryStore::new();
    let mut uow = memory_uow(&store).await;

    uow.begin_transaction().await.unwrap();
    uow.projects().add(project("Saved then disposed")).unwrap();
    uow.save_changes().await.unwrap();
    uow.skills().add(skill("Unsaved", SkillCategory::Tools, 0)).unwrap();

    uow.dispose().await.unwrap();
    uow.dispose().await.unwrap();

    assert_eq!(uow.transaction_state(), TransactionState::Idle);
    assert!(!uow.has_changes());
    assert_eq!(store.row_count::<Project>(), 0);
    assert_eq!(store.row_count::<Skill>(), 0);
}

#[tokio::test]
async fn dropping_an_open_unit_of_work_loses_its_writes() {
    let store = MemoryStore::new();
    {
        let mut uow = memory_uow(&store).await;
        uow.begin_transaction().await.unwrap();
        uow.projects().add(project("Aborted request")).unwrap();
        uow.save_changes().await.unwrap();
    }

    assert_eq!(store.row_count::<Project>(), 0);
    let mut uow = memory_uow(&store).await;
    assert!(uow.projects().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_save_keeps_staged_changes_and_writes_nothing() {
    let store = MemoryStore::new();
    let mut first = memory_uow(&store).await;
    let existing = first.projects().add(project("Existing")).unwrap();
    first.save_changes().await.unwrap();

    // A second unit of work inserts the same id: the flush fails part way.
    let mut uow = memory_uow(&store).await;
    uow.contact_messages()
        .add(ContactMessage {
            meta: Default::default(),
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            subject: "Hello".to_string(),
            message: "A message long enough".to_string(),
            is_read: false,
        })
        .unwrap();
    let mut duplicate = project("Duplicate");
    duplicate.meta.id = existing.meta.id;
    uow.projects().add(duplicate).unwrap();

    let result = uow.save_changes().await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(uow.has_changes());
    assert_eq!(store.row_count::<ContactMessage>(), 0);
    assert_eq!(store.raw_row::<Project>(existing.meta.id).unwrap().title, "Existing");
}

#[tokio::test]
async fn sessions_only_see_committed_writes_of_others() {
    let store = MemoryStore::new();
    let mut writer = memory_uow(&store).await;
    let mut reader = memory_uow(&store).await;

    writer.begin_transaction().await.unwrap();
    let added = writer.projects().add(project("Pending")).unwrap();
    writer.save_changes().await.unwrap();

    assert!(reader.projects().get_by_id(added.meta.id).await.unwrap().is_none());

    writer.commit().await.unwrap();
    assert!(reader.projects().get_by_id(added.meta.id).await.unwrap().is_some());
}

#[tokio::test]
async fn memory_session_rejects_nested_transactions() {
    let store = MemoryStore::new();
    let mut session = portfolio_site::repositories::store::Store::open_session(&store)
        .await
        .unwrap();

    session.begin().await.unwrap();
    assert!(session.in_transaction());
    assert!(session.begin().await.is_err());
    session.rollback().await.unwrap();
    assert!(!session.in_transaction());
}
