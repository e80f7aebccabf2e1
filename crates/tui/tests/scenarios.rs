use std::sync::Arc;
use std::time::Duration;

use combobox_engine::{CandidateFetcher, CandidatePool, StaticFetcher, spawn_fetch};
use combobox_tui::replay::{ScriptEvent, replay};
use combobox_tui::{CallSite, EMPTY_DISPLAY, SubmitFormState, SubmitOutcome};
use combobox_types::{Choice, ComboboxConfig, Phase, ValidationError};
use tokio::sync::mpsc;

const BUSINESS_SERVICE_ERROR: &str =
    "Business Service must be selected in the dropdown or clear input before submitting";

fn business_services() -> CandidatePool {
    CandidatePool::from(vec![
        Choice::plain("PolicyEnforcementService.GLB"),
        Choice::plain("athenz.zms"),
        Choice::plain("athenz.zts"),
        Choice::plain("athenz.ui"),
    ])
    .with_associated(["athenz.zms", "athenz.zts", "athenz.ui"])
}

fn users() -> CandidatePool {
    CandidatePool::all_known(
        vec![
            Choice::user("craman", "Chandu Raman"),
            Choice::user("dsmith", "Dana Smith"),
        ]
        .into(),
    )
}

fn open_form(site: CallSite, pool: CandidatePool) -> SubmitFormState {
    let mut form = SubmitFormState::new(site, &ComboboxConfig::default(), pool);
    form.open();
    form
}

/// Texts covering ASCII, mixed case, surrounding spaces, partial and full
/// labels, and non-ASCII input.
const TYPED_TEXTS: &[&str] = &[
    "a",
    "athenz",
    "ATHENZ.ZMS",
    " athenz.zms",
    "athenz.zms ",
    "nonexistent.service",
    "PolicyEnforcementService",
    "zts",
    "ü-service",
    "日本語",
    "athenz.zms.extra",
];

#[test]
fn unselected_business_service_blocks_submit() {
    let mut form = open_form(CallSite::DomainBusinessService, business_services());
    form.combobox_mut().on_type("nonexistent.service");
    form.combobox_mut().on_blur();

    assert_eq!(form.combobox().text(), "nonexistent.service");
    assert!(!form.combobox().is_bold());

    let outcome = form.submit();
    assert_eq!(outcome, SubmitOutcome::Rejected(BUSINESS_SERVICE_ERROR.into()));
    assert_eq!(form.error_message(), Some(BUSINESS_SERVICE_ERROR));
    assert!(form.is_open());
    assert_eq!(form.display(), EMPTY_DISPLAY);
}

#[test]
fn dropdown_selected_business_service_submits() {
    let mut form = open_form(CallSite::DomainBusinessService, business_services());
    assert!(form.toggle_show_all());

    form.combobox_mut().on_clear();
    form.combobox_mut().on_type("PolicyEnforcementService.GLB");
    let offered = form.combobox().filtered().to_vec();
    assert_eq!(offered, vec![Choice::plain("PolicyEnforcementService.GLB")]);
    form.combobox_mut().on_select(&offered[0]).expect("offered choice");

    assert_eq!(form.combobox().text(), "PolicyEnforcementService.GLB");
    assert!(form.combobox().is_bold());

    let outcome = form.submit();
    assert_eq!(
        outcome,
        SubmitOutcome::Committed(Some(Choice::plain("PolicyEnforcementService.GLB")))
    );
    assert_eq!(form.display(), "PolicyEnforcementService.GLB");
}

#[test]
fn clearing_committed_business_service_shows_add() {
    let mut form = open_form(CallSite::DomainBusinessService, business_services());
    form.combobox_mut().on_type("zms");
    form.combobox_mut().on_select(&Choice::plain("athenz.zms")).expect("offered");
    assert!(matches!(form.submit(), SubmitOutcome::Committed(Some(_))));
    assert_eq!(form.display(), "athenz.zms");

    form.open();
    assert_eq!(form.combobox().text(), "athenz.zms");
    assert!(form.combobox().is_bold());

    form.combobox_mut().on_clear();
    assert_eq!(form.submit(), SubmitOutcome::Committed(None));
    assert_eq!(form.display(), EMPTY_DISPLAY);
    assert!(form.committed().is_none());
}

#[test]
fn config_without_empty_submit_rejects_cleared_business_service() {
    let config: ComboboxConfig = serde_json::from_str(r#"{"allow_empty_submit": false}"#).expect("config");
    let mut form = SubmitFormState::new(CallSite::DomainBusinessService, &config, business_services())
        .with_committed(Some(Choice::plain("athenz.zms")));
    form.open();
    form.combobox_mut().on_clear();

    assert_eq!(form.submit(), SubmitOutcome::Rejected(BUSINESS_SERVICE_ERROR.into()));
    assert_eq!(form.display(), "athenz.zms");
}

#[test]
fn manage_domains_message_has_no_hint() {
    let mut form = open_form(CallSite::ManageDomainsBusinessService, business_services());
    form.combobox_mut().on_type("nonexistent.service");
    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected("Business Service must be selected in the dropdown".into())
    );
}

#[test]
fn point_of_contact_requires_selected_user() {
    let mut form = open_form(CallSite::PointOfContact, users());
    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected("Point of Contact must be selected in the dropdown".into())
    );

    form.combobox_mut().on_type("craman");
    assert_eq!(form.combobox().filtered(), &[Choice::user("craman", "Chandu Raman")]);
    form.combobox_mut()
        .on_select(&Choice::user("craman", "Chandu Raman"))
        .expect("offered");
    assert_eq!(form.combobox().text(), "Chandu Raman [user.craman]");

    let outcome = form.submit();
    assert_eq!(
        outcome,
        SubmitOutcome::Committed(Some(Choice::new("user.craman", "Chandu Raman [user.craman]")))
    );
}

#[test]
fn security_contact_rejects_typed_user_name() {
    let mut form = open_form(CallSite::SecurityPointOfContact, users());
    form.combobox_mut().on_type("Chandu Raman [user.craman]");
    assert!(!form.combobox().is_bold());
    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected("Security Point of Contact must be selected in the dropdown".into())
    );
}

#[test]
fn history_roles_and_workflow_domain_follow_same_rule() {
    let roles = CandidatePool::all_known(vec![Choice::plain("admin"), Choice::plain("readers")].into());
    let mut form = open_form(CallSite::HistoryRoles, roles);
    form.combobox_mut().on_type("admin");
    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected("Role must be selected in the dropdown".into())
    );
    form.combobox_mut().on_select(&Choice::plain("admin")).expect("offered");
    assert!(matches!(form.submit(), SubmitOutcome::Committed(Some(_))));

    let domains = CandidatePool::all_known(vec![Choice::plain("athenz"), Choice::plain("athenz.dev")].into());
    let mut form = open_form(CallSite::WorkflowDomain, domains);
    form.combobox_mut().on_type("athenz.de");
    form.combobox_mut().on_blur();
    assert_eq!(
        form.submit(),
        SubmitOutcome::Rejected("Domain must be selected in the dropdown".into())
    );
}

#[test]
fn typed_text_is_never_confirmed_or_altered_by_blur() {
    for text in TYPED_TEXTS {
        let mut form = open_form(CallSite::DomainBusinessService, business_services());
        form.combobox_mut().on_type(*text);
        form.combobox_mut().on_blur();
        assert_eq!(form.combobox().text(), *text, "text altered for {text:?}");
        assert!(form.combobox().confirmed().is_none(), "confirmed without select for {text:?}");
        assert_eq!(form.combobox().phase(), Phase::Typing);
    }
}

#[test]
fn selecting_any_offered_choice_confirms_it() {
    let pool = business_services();
    for choice in pool.universe().iter() {
        let mut form = open_form(CallSite::ManageDomainsBusinessService, pool.clone());
        form.toggle_show_all();
        form.combobox_mut().on_type(choice.label.as_str());
        form.combobox_mut().on_select(choice).expect("offered");
        assert_eq!(form.combobox().text(), choice.label);
        assert_eq!(form.combobox().confirmed(), Some(choice));
        assert!(form.combobox().is_bold());
    }
}

#[test]
fn diverging_edit_drops_confirmation() {
    for suffix in ["x", " ", ".", "Z"] {
        let mut form = open_form(CallSite::ManageDomainsBusinessService, business_services());
        form.combobox_mut().on_type("zts");
        form.combobox_mut().on_select(&Choice::plain("athenz.zts")).expect("offered");
        form.combobox_mut().insert_str(suffix);
        assert!(form.combobox().confirmed().is_none(), "still confirmed after {suffix:?}");
        assert!(!form.combobox().is_bold());
    }
}

#[test]
fn empty_submission_follows_allow_empty() {
    let state = open_form(CallSite::PointOfContact, users());
    assert_eq!(
        state.combobox().validate_for_submit(false),
        Err(ValidationError::MustSelectFromDropdown)
    );
    assert_eq!(state.combobox().validate_for_submit(true), Ok(None));
}

#[test]
fn clear_always_returns_to_empty() {
    let steps: Vec<Vec<ScriptEvent>> = vec![
        vec![],
        vec![ScriptEvent::Type { text: "athenz".into() }],
        vec![
            ScriptEvent::Type { text: "zms".into() },
            ScriptEvent::Select { label: "athenz.zms".into() },
        ],
        vec![
            ScriptEvent::Type { text: "zms".into() },
            ScriptEvent::Select { label: "athenz.zms".into() },
            ScriptEvent::Append { text: "!".into() },
            ScriptEvent::Blur,
        ],
    ];
    for mut script in steps {
        script.push(ScriptEvent::Clear);
        let mut form = open_form(CallSite::DomainBusinessService, business_services());
        let reports = replay(&mut form, &script);
        let last = reports.last().expect("clear report");
        assert_eq!(last.phase, Phase::Empty);
        assert_eq!(last.text, "");
        assert!(!last.bold);
    }
}

#[test]
fn restriction_toggle_changes_offer_immediately() {
    let mut form = open_form(CallSite::DomainBusinessService, business_services());
    let reports = replay(
        &mut form,
        &[
            ScriptEvent::Type { text: "policy".into() },
            ScriptEvent::ToggleShowAll,
            ScriptEvent::ToggleShowAll,
        ],
    );
    assert!(reports[0].dropdown.is_empty());
    assert_eq!(reports[1].dropdown, vec!["PolicyEnforcementService.GLB".to_string()]);
    assert!(reports[2].dropdown.is_empty());
}

#[tokio::test]
async fn superseded_fetch_never_lands() {
    let mut form = open_form(CallSite::ManageDomainsBusinessService, business_services());
    let slow: Arc<dyn CandidateFetcher> =
        Arc::new(StaticFetcher::new(business_services()).with_latency(Duration::from_millis(80)));
    let fast: Arc<dyn CandidateFetcher> = Arc::new(StaticFetcher::new(business_services()));
    let (sender, mut receiver) = mpsc::unbounded_channel();

    form.combobox_mut().on_type("athenz");
    let (stale_ticket, stale_request) = form.combobox_mut().begin_fetch();
    spawn_fetch(slow, stale_ticket, stale_request, sender.clone());

    form.combobox_mut().on_type("athenz.zt");
    let (ticket, request) = form.combobox_mut().begin_fetch();
    spawn_fetch(fast, ticket, request, sender);

    let mut applied = Vec::new();
    while let Some(completion) = receiver.recv().await {
        let pool = completion.result.expect("static fetch");
        applied.push(form.combobox_mut().apply_fetch(&completion.ticket, pool));
    }

    assert_eq!(applied, vec![true, false]);
    assert_eq!(form.combobox().filtered(), &[Choice::plain("athenz.zts")]);
    assert!(!form.combobox().is_loading());
}
