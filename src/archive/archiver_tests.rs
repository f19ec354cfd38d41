//! Tests for single pull request archival.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::{ArchiveOutcome, ArchiveWorker, Omission, PullRequestArchiver};
use crate::archive::error::ArchiveError;
use crate::archive::maildir::{MessageStore, MockMessageStore};
use crate::archive::recipient::Recipient;
use crate::github::error::IntakeError;
use crate::github::gateway::{MockPullRequestGateway, MockUserGateway, PaginatedComments};
use crate::github::locator::RepositoryLocator;
use crate::github::models::test_support::{issue_comment, pull_request};
use crate::github::models::{AuthenticatedUser, IssueComment, PullRequest};
use crate::github::pagination::PageInfo;

/// Keeps delivered messages in memory.
#[derive(Debug, Default)]
struct RecordingStore {
    delivered: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn messages(&self) -> Vec<String> {
        self.delivered
            .lock()
            .expect("recording mutex should be available")
            .clone()
    }
}

impl MessageStore for RecordingStore {
    fn deliver(&self, message: &[u8]) -> Result<String, ArchiveError> {
        let mut delivered = self
            .delivered
            .lock()
            .expect("recording mutex should be available");
        delivered.push(String::from_utf8_lossy(message).into_owned());
        Ok(format!("new/{}", delivered.len()))
    }
}

#[fixture]
fn opened() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn pr(opened: DateTime<Utc>) -> PullRequest {
    pull_request(42, "Add feature", "octocat", opened)
}

fn comment_page(page: u32, has_next: bool, items: Vec<IssueComment>) -> PaginatedComments {
    PaginatedComments {
        items,
        page_info: PageInfo::builder(page, 100).has_next(has_next).build(),
    }
}

fn recipient() -> Arc<Recipient> {
    let mut users = MockUserGateway::new();
    users.expect_current_user().returning(|| {
        Ok(AuthenticatedUser {
            login: "mona".to_owned(),
        })
    });
    Arc::new(Recipient::new(Arc::new(users), Some("workstation".to_owned())))
}

fn archiver(gateway: MockPullRequestGateway, store: Arc<dyn MessageStore>) -> PullRequestArchiver {
    let locator = RepositoryLocator::from_slug("octo/repo").expect("slug should parse");
    PullRequestArchiver::new(Arc::new(gateway), store, recipient(), locator)
}

fn subject_line(message: &str) -> &str {
    message
        .lines()
        .find(|line| line.starts_with("Subject: "))
        .unwrap_or_default()
}

fn author_line(message: &str) -> &str {
    message
        .lines()
        .find(|line| line.starts_with("From: "))
        .unwrap_or_default()
}

#[rstest]
#[tokio::test]
async fn archives_body_comments_and_patch_in_time_order(pr: PullRequest, opened: DateTime<Utc>) {
    let alice = issue_comment(1, "alice", "Looks good", opened + Duration::hours(1));
    let bob = issue_comment(2, "bob", "Agreed", opened + Duration::hours(2));

    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_pull_request_patch()
        .times(1)
        .returning(|_| Ok("From abc123\n+added\n".to_owned()));
    gateway
        .expect_list_issue_comments()
        .times(1)
        .returning(move |_, _| Ok(comment_page(1, false, vec![alice.clone(), bob.clone()])));

    let store = Arc::new(RecordingStore::default());
    let outcome = archiver(gateway, Arc::clone(&store) as Arc<dyn MessageStore>)
        .archive(&pr)
        .await;

    assert_eq!(
        outcome,
        ArchiveOutcome::Complete {
            messages: vec![
                "new/1".to_owned(),
                "new/2".to_owned(),
                "new/3".to_owned(),
                "new/4".to_owned(),
            ],
        }
    );

    let messages = store.messages();
    let authors: Vec<&str> = messages.iter().map(|m| author_line(m)).collect();
    assert_eq!(
        authors,
        vec![
            "From: octocat@users.noreply.github.com",
            "From: alice@users.noreply.github.com",
            "From: bob@users.noreply.github.com",
            "From: @users.noreply.github.com",
        ]
    );
    let subjects: Vec<&str> = messages.iter().map(|m| subject_line(m)).collect();
    assert_eq!(
        subjects,
        vec![
            "Subject: [#42] Add feature",
            "Subject: RE: [#42] Add feature",
            "Subject: RE: [#42] Add feature",
            "Subject: RE: [#42] Add feature",
        ]
    );
    assert!(
        messages
            .iter()
            .all(|m| m.contains("\nTo: mona@workstation\n")),
        "every message should be addressed to the authenticated user"
    );
}

#[rstest]
#[tokio::test]
async fn patch_failure_degrades_but_succeeds(pr: PullRequest) {
    let mut gateway = MockPullRequestGateway::new();
    gateway.expect_pull_request_patch().returning(|_| {
        Err(IntakeError::Api {
            message: "bad response (404)".to_owned(),
        })
    });
    gateway
        .expect_list_issue_comments()
        .returning(|_, _| Ok(comment_page(1, false, vec![])));

    let store = Arc::new(RecordingStore::default());
    let outcome = archiver(gateway, Arc::clone(&store) as Arc<dyn MessageStore>)
        .archive(&pr)
        .await;

    match &outcome {
        ArchiveOutcome::Degraded {
            messages,
            omissions,
        } => {
            assert_eq!(messages.len(), 1, "only the body should be written");
            assert!(matches!(omissions.as_slice(), [Omission::Patch(_)]));
        }
        other => panic!("expected degraded outcome, got {other:?}"),
    }
    let status = outcome.into_status(pr.number);
    assert!(status.success);
    assert_eq!(status.filename.as_deref(), Some("new/1"));
}

#[rstest]
#[tokio::test]
async fn comment_failure_keeps_earlier_pages(pr: PullRequest, opened: DateTime<Utc>) {
    let alice = issue_comment(1, "alice", "First page", opened + Duration::hours(1));

    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_pull_request_patch()
        .returning(|_| Ok("diff".to_owned()));
    gateway
        .expect_list_issue_comments()
        .times(2)
        .returning(move |_, params| match params.page {
            1 => Ok(comment_page(1, true, vec![alice.clone()])),
            _ => Err(IntakeError::Network {
                message: "connection reset".to_owned(),
            }),
        });

    let store = Arc::new(RecordingStore::default());
    let outcome = archiver(gateway, Arc::clone(&store) as Arc<dyn MessageStore>)
        .archive(&pr)
        .await;

    match outcome {
        ArchiveOutcome::Degraded {
            messages,
            omissions,
        } => {
            assert_eq!(messages.len(), 3, "body, patch and one comment");
            assert!(
                matches!(
                    omissions.as_slice(),
                    [Omission::Comments {
                        pages_fetched: 1,
                        error: IntakeError::Network { .. }
                    }]
                ),
                "unexpected omissions {omissions:?}"
            );
        }
        other => panic!("expected degraded outcome, got {other:?}"),
    }
    assert!(
        store.messages().iter().any(|m| m.contains("\nFirst page\n")),
        "page one comment should be archived"
    );
}

#[rstest]
#[tokio::test]
async fn follows_comment_pages_until_last(pr: PullRequest, opened: DateTime<Utc>) {
    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_pull_request_patch()
        .returning(|_| Ok("diff".to_owned()));
    gateway
        .expect_list_issue_comments()
        .times(3)
        .returning(move |_, params| {
            let page = params.page;
            let item = issue_comment(
                u64::from(page),
                "alice",
                "comment",
                opened + Duration::hours(i64::from(page)),
            );
            Ok(comment_page(page, page < 3, vec![item]))
        });

    let store = Arc::new(RecordingStore::default());
    let outcome = archiver(gateway, Arc::clone(&store) as Arc<dyn MessageStore>)
        .archive(&pr)
        .await;

    assert!(matches!(outcome, ArchiveOutcome::Complete { ref messages } if messages.len() == 5));
}

#[rstest]
#[tokio::test]
async fn store_failure_fails_the_pull_request(pr: PullRequest) {
    let mut gateway = MockPullRequestGateway::new();
    gateway
        .expect_pull_request_patch()
        .returning(|_| Ok("diff".to_owned()));
    gateway
        .expect_list_issue_comments()
        .returning(|_, _| Ok(comment_page(1, false, vec![])));

    let mut store = MockMessageStore::new();
    store.expect_deliver().times(1).returning(|_| {
        Err(ArchiveError::Store {
            path: "archive/tmp".into(),
            message: "disk full".to_owned(),
        })
    });

    let status = archiver(gateway, Arc::new(store)).archive_one(&pr).await;

    assert!(!status.success);
    assert_eq!(status.filename, None);
    assert_eq!(status.number, pr.number);
    assert!(matches!(status.error, Some(ArchiveError::Store { .. })));
}

/// Blocks each delivery until the async side releases it.
struct GatedStore {
    started: tokio::sync::mpsc::UnboundedSender<()>,
    release: Mutex<std::sync::mpsc::Receiver<()>>,
}

impl MessageStore for GatedStore {
    fn deliver(&self, _message: &[u8]) -> Result<String, ArchiveError> {
        self.started
            .send(())
            .expect("test should be listening for deliveries");
        let release = self
            .release
            .lock()
            .expect("release mutex should be available");
        release
            .recv_timeout(std::time::Duration::from_secs(5))
            .map(|()| "new/gated".to_owned())
            .map_err(|error| ArchiveError::Store {
                path: "gated".into(),
                message: error.to_string(),
            })
    }
}

#[rstest]
#[tokio::test(flavor = "current_thread")]
async fn slow_delivery_leaves_the_runtime_free(pr: PullRequest) {
    let mut gateway = MockPullRequestGateway::new();
    gateway.expect_pull_request_patch().returning(|_| {
        Err(IntakeError::Api {
            message: "bad response (404)".to_owned(),
        })
    });
    gateway
        .expect_list_issue_comments()
        .returning(|_, _| Ok(comment_page(1, false, vec![])));

    let (started_tx, mut started_rx) = tokio::sync::mpsc::unbounded_channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel();
    let store = GatedStore {
        started: started_tx,
        release: Mutex::new(release_rx),
    };
    let archiver = archiver(gateway, Arc::new(store));

    // The release is sent from this runtime's only thread while the
    // delivery is waiting, so it only arrives if delivery runs elsewhere.
    let releaser = async {
        started_rx.recv().await.expect("delivery should start");
        release_tx.send(()).expect("delivery should be waiting");
    };
    let (status, ()) = tokio::join!(archiver.archive_one(&pr), releaser);

    assert!(status.success, "unexpected failure: {:?}", status.error);
    assert_eq!(status.filename.as_deref(), Some("new/gated"));
}
