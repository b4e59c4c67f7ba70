use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_core::Subject;
use gatehouse_domain::{
    Action, Permission, PermissionCatalog, PermissionEntry, PermissionSet, Resource,
};
use proptest::prelude::*;
use tokio::sync::Mutex;

use crate::console_ports::{Notice, Notifier};

use super::{
    AuthorizationGate, PERMISSION_DENIED_NOTICE_ID, PermissionModel, RouteGuard,
    RouteGuardConfig, RouteState,
};

#[derive(Default)]
struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notice: Notice) {
        self.notices.lock().await.push(notice);
    }
}

fn permission(value: &str) -> Permission {
    Permission::from_str(value).unwrap_or_else(|_| unreachable!())
}

fn grants(values: &[&str]) -> PermissionSet {
    values.iter().map(|value| permission(value)).collect()
}

fn model() -> PermissionModel {
    let developer = PermissionEntry::new(
        "Desarrollador",
        ["user:view:self", "equipment:view:self", "equipment:update:self"],
    )
    .unwrap_or_else(|_| unreachable!());
    let admin = PermissionEntry::new("Administrador", ["user:view:any", "equipment:view:any"])
        .unwrap_or_else(|_| unreachable!());
    let catalog =
        PermissionCatalog::new(vec![developer, admin]).unwrap_or_else(|_| unreachable!());
    PermissionModel::new(catalog)
}

#[derive(Debug, Clone, PartialEq)]
struct OwnedDevice {
    id: u32,
    owner_id: &'static str,
}

fn devices() -> Vec<OwnedDevice> {
    vec![
        OwnedDevice {
            id: 1,
            owner_id: "u1",
        },
        OwnedDevice {
            id: 2,
            owner_id: "u2",
        },
    ]
}

#[test]
fn unknown_roles_resolve_to_no_permissions() {
    assert!(model().permissions_for_role("Invitado").is_empty());
}

#[test]
fn has_any_with_empty_required_and_grants_is_false() {
    let granted = grants(&["user:view:any"]);
    assert!(!PermissionModel::has_any(&[], &granted));
    assert!(PermissionModel::has_any(&[], &PermissionSet::new()));
}

#[test]
fn self_scope_matches_only_the_actor() {
    let gate = AuthorizationGate::new(grants(&["equipment:update:self"]), Some("u1".to_owned()));

    assert!(gate.can_perform_action(Resource::Equipment, Action::Update, Some("u1")));
    assert!(!gate.can_perform_action(Resource::Equipment, Action::Update, Some("u2")));
    assert!(!gate.can_perform_action(Resource::Equipment, Action::Update, None));
    assert!(!gate.can_perform_action(Resource::Equipment, Action::Delete, Some("u1")));
}

#[test]
fn any_scope_allows_every_record() {
    let gate = AuthorizationGate::new(grants(&["equipment:view:any"]), Some("u1".to_owned()));
    assert!(gate.can_perform_action(Resource::Equipment, Action::View, Some("u9")));
    assert!(gate.require_action(Resource::Equipment, Action::View, None).is_ok());
    assert!(gate.require_action(Resource::Access, Action::Approve, None).is_err());
}

#[test]
fn actor_without_id_never_satisfies_self() {
    let gate = AuthorizationGate::new(grants(&["equipment:view:self"]), None);
    let visible = gate.filter_by_permission(devices(), Resource::Equipment, Action::View, |d| {
        Some(d.owner_id)
    });
    assert!(visible.is_empty());
}

#[test]
fn developer_sees_only_own_devices() {
    let subject = Subject::new("u1", "Amy", "amy@example.com", "Desarrollador")
        .unwrap_or_else(|_| unreachable!());
    let gate = model().gate_for(&subject);

    let visible = gate.filter_by_permission(devices(), Resource::Equipment, Action::View, |d| {
        Some(d.owner_id)
    });
    assert_eq!(visible.iter().map(|device| device.id).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn missing_grants_hide_everything() {
    let gate = AuthorizationGate::new(grants(&["user:view:any"]), Some("u1".to_owned()));
    let visible = gate.filter_by_permission(devices(), Resource::Equipment, Action::View, |d| {
        Some(d.owner_id)
    });
    assert!(visible.is_empty());
}

#[test]
fn empty_grants_fail_open() {
    let gate = AuthorizationGate::new(PermissionSet::new(), Some("u1".to_owned()));
    assert!(gate.can_perform_action(Resource::User, Action::Delete, Some("u2")));
    assert_eq!(
        gate.filter_by_permission(devices(), Resource::Equipment, Action::View, |d| {
            Some(d.owner_id)
        })
        .len(),
        2
    );
}

#[tokio::test]
async fn route_guard_redirects_without_session() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut guard = RouteGuard::new(RouteGuardConfig::default(), notifier.clone());

    let outcome = guard
        .evaluate("/devices", &[permission("equipment:view:any")], None)
        .await;
    assert_eq!(outcome.state, RouteState::Unauthenticated);
    assert_eq!(outcome.redirect_to.as_deref(), Some("/"));
    assert!(notifier.notices.lock().await.is_empty());
}

#[tokio::test]
async fn route_guard_notifies_once_per_denied_route() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut guard = RouteGuard::new(RouteGuardConfig::default(), notifier.clone());
    let gate = AuthorizationGate::new(grants(&["user:view:self"]), Some("u1".to_owned()));
    let required = [permission("user:view:any")];

    for _ in 0..3 {
        let outcome = guard.evaluate("/users", &required, Some(&gate)).await;
        assert_eq!(outcome.state, RouteState::Unauthorized);
        assert_eq!(outcome.redirect_to.as_deref(), Some("/dashboard"));
    }

    let notices = notifier.notices.lock().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].id.as_deref(), Some(PERMISSION_DENIED_NOTICE_ID));
}

#[tokio::test]
async fn route_guard_notifies_again_after_an_authorized_visit() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut guard = RouteGuard::new(RouteGuardConfig::default(), notifier.clone());
    let gate = AuthorizationGate::new(grants(&["user:view:self"]), Some("u1".to_owned()));
    let required = [permission("user:view:any")];

    let _ = guard.evaluate("/users", &required, Some(&gate)).await;
    let outcome = guard.evaluate("/dashboard", &[], Some(&gate)).await;
    assert_eq!(outcome.state, RouteState::Authorized);
    let _ = guard.evaluate("/users", &required, Some(&gate)).await;

    assert_eq!(notifier.notices.lock().await.len(), 2);
}

#[tokio::test]
async fn own_detail_route_bypasses_requirements() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut guard = RouteGuard::new(RouteGuardConfig::default(), notifier.clone());
    let gate = AuthorizationGate::new(grants(&["user:view:self"]), Some("u1".to_owned()));
    let required = [permission("user:view:any")];

    let own = guard.evaluate("/user/u1", &required, Some(&gate)).await;
    assert_eq!(own.state, RouteState::Authorized);

    let other = guard.evaluate("/user/u2", &required, Some(&gate)).await;
    assert_eq!(other.state, RouteState::Unauthorized);
}

#[tokio::test]
async fn routes_nested_under_own_detail_still_need_permissions() {
    let notifier = Arc::new(RecordingNotifier::default());
    let mut guard = RouteGuard::new(RouteGuardConfig::default(), notifier.clone());
    let gate = AuthorizationGate::new(grants(&["user:view:self"]), Some("u1".to_owned()));
    let required = [permission("equipment:view:any")];

    let nested = guard.evaluate("/user/u1/devices", &required, Some(&gate)).await;
    assert_eq!(nested.state, RouteState::Unauthorized);
    assert_eq!(notifier.notices.lock().await.len(), 1);

    let own = guard.evaluate("/user/u1", &required, Some(&gate)).await;
    assert_eq!(own.state, RouteState::Authorized);
}

fn permission_strategy() -> impl Strategy<Value = Permission> {
    (
        prop_oneof![
            Just("user"),
            Just("equipment"),
            Just("access"),
            Just("software")
        ],
        prop_oneof![
            Just("create"),
            Just("view"),
            Just("update"),
            Just("delete"),
            Just("approve")
        ],
        prop_oneof![Just("any"), Just("self")],
    )
        .prop_map(|(resource, action, scope)| {
            permission(&format!("{resource}:{action}:{scope}"))
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn empty_grant_set_allows_any_requirement(
        required in prop::collection::vec(permission_strategy(), 1..6)
    ) {
        prop_assert!(PermissionModel::has_any(&required, &PermissionSet::new()));
    }

    #[test]
    fn non_empty_grants_require_an_intersection(
        required in prop::collection::vec(permission_strategy(), 0..6),
        granted in prop::collection::btree_set(permission_strategy(), 1..6),
    ) {
        let expected = required.iter().any(|permission| granted.contains(permission));
        prop_assert_eq!(PermissionModel::has_any(&required, &granted), expected);
    }
}
