use lms_route_guard::{
    guard::{
        AccessPolicy, CAREER_GUIDANCE_PATH, Decision, GuardState, HOME_PATH, LOGIN_PATH, assess,
        evaluate,
    },
    models::{EducationLevel, Role, SessionState, SessionUser},
};

// --- Helpers ---

fn redirect(path: &str) -> Decision {
    Decision::RedirectTo {
        path: path.to_string(),
    }
}

/// Every shape of policy the table can carry, with a few role and level sets.
fn all_policies() -> Vec<AccessPolicy> {
    vec![
        AccessPolicy::Public,
        AccessPolicy::Authenticated,
        AccessPolicy::roles([Role::Student]),
        AccessPolicy::roles([Role::Instructor, Role::Admin]),
        AccessPolicy::roles(Role::ALL),
        AccessPolicy::education_levels([EducationLevel::OLevel]),
        AccessPolicy::education_levels([EducationLevel::OLevel, EducationLevel::ALevel]),
    ]
}

fn every_user() -> Vec<SessionUser> {
    let mut users: Vec<SessionUser> = Role::ALL.into_iter().map(SessionUser::new).collect();
    users.extend(
        EducationLevel::ALL
            .into_iter()
            .map(|level| SessionUser::student(Some(level))),
    );
    users
}

// --- Properties ---

#[test]
fn test_anonymous_is_always_sent_to_login() {
    for policy in all_policies()
        .into_iter()
        .filter(AccessPolicy::requires_authentication)
    {
        let decision = evaluate(&policy, &SessionState::anonymous());
        assert_eq!(decision, redirect(LOGIN_PATH), "policy {:?}", policy);
    }
}

#[test]
fn test_loading_shows_indicator_for_every_policy() {
    for policy in all_policies() {
        assert_eq!(
            evaluate(&policy, &SessionState::loading()),
            Decision::ShowLoadingIndicator
        );
        assert_eq!(assess(&policy, &SessionState::loading()), GuardState::Loading);
    }
}

#[test]
fn test_loading_wins_even_when_a_user_is_present() {
    let session = SessionState {
        is_loading: true,
        user: Some(SessionUser::new(Role::Admin)),
    };
    assert_eq!(
        evaluate(&AccessPolicy::roles([Role::Admin]), &session),
        Decision::ShowLoadingIndicator
    );
}

#[test]
fn test_role_denial_names_every_allowed_role() {
    let role_sets = [
        vec![Role::Admin],
        vec![Role::Instructor, Role::Admin],
        vec![Role::Employer, Role::UniversityAdmin, Role::MinistryOfficial],
    ];

    for allowed in role_sets {
        let policy = AccessPolicy::roles(allowed.clone());
        for user in every_user().into_iter().filter(|u| !allowed.contains(&u.role)) {
            match evaluate(&policy, &SessionState::signed_in(user)) {
                Decision::RenderDenialView {
                    message,
                    allowed_roles,
                } => {
                    assert_eq!(allowed_roles, allowed);
                    for role in &allowed {
                        assert!(message.contains(role.as_str()), "{} missing from {}", role, message);
                    }
                }
                other => panic!("expected denial view, got {:?}", other),
            }
        }
    }
}

#[test]
fn test_allowed_role_renders() {
    let policy = AccessPolicy::roles([Role::Instructor, Role::Admin]);
    for role in [Role::Instructor, Role::Admin] {
        let session = SessionState::signed_in(SessionUser::new(role));
        assert_eq!(evaluate(&policy, &session), Decision::RenderComponent);
        assert_eq!(assess(&policy, &session), GuardState::AuthorizedRoleOnly);
    }
}

#[test]
fn test_any_signed_in_role_passes_authenticated_policy() {
    for user in every_user() {
        assert_eq!(
            evaluate(&AccessPolicy::Authenticated, &SessionState::signed_in(user)),
            Decision::RenderComponent
        );
    }
}

#[test]
fn test_student_with_matching_level_renders() {
    let policy = AccessPolicy::education_levels([EducationLevel::OLevel, EducationLevel::ALevel]);
    for level in [EducationLevel::OLevel, EducationLevel::ALevel] {
        let session = SessionState::signed_in(SessionUser::student(Some(level)));
        assert_eq!(evaluate(&policy, &session), Decision::RenderComponent);
        assert_eq!(assess(&policy, &session), GuardState::AuthorizedEducationLevel);
    }
}

#[test]
fn test_student_with_other_level_goes_to_career_guidance() {
    let policy = AccessPolicy::education_levels([EducationLevel::OLevel]);
    for level in [
        Some(EducationLevel::ALevel),
        Some(EducationLevel::Undergraduate),
        Some(EducationLevel::Postgraduate),
        None,
    ] {
        let session = SessionState::signed_in(SessionUser::student(level));
        assert_eq!(evaluate(&policy, &session), redirect(CAREER_GUIDANCE_PATH));
        assert_eq!(
            assess(&policy, &session),
            GuardState::DeniedEducationLevel { is_student: true }
        );
    }
}

#[test]
fn test_non_student_on_level_route_goes_home_regardless_of_level() {
    let policy = AccessPolicy::education_levels([EducationLevel::OLevel]);
    let non_students = Role::ALL.into_iter().filter(|role| *role != Role::Student);

    for role in non_students {
        for level in [None, Some(EducationLevel::OLevel), Some(EducationLevel::ALevel)] {
            let user = SessionUser {
                current_education_level: level,
                ..SessionUser::new(role)
            };
            assert_eq!(
                evaluate(&policy, &SessionState::signed_in(user)),
                redirect(HOME_PATH)
            );
        }
    }
}

#[test]
fn test_evaluation_is_idempotent() {
    let session = SessionState::signed_in(SessionUser::student(Some(EducationLevel::ALevel)));
    for policy in all_policies() {
        assert_eq!(evaluate(&policy, &session), evaluate(&policy, &session));
    }
}

// --- Scenarios ---

#[test]
fn test_scenario_student_on_instructor_admin_page() {
    let policy = AccessPolicy::roles([Role::Instructor, Role::Admin]);
    let session = SessionState::signed_in(SessionUser::new(Role::Student));

    let Decision::RenderDenialView { message, .. } = evaluate(&policy, &session) else {
        panic!("student must see the denial view");
    };
    assert!(message.contains("instructor, admin"));
    assert_eq!(assess(&policy, &session), GuardState::DeniedRole);
}

#[test]
fn test_scenario_a_level_student_on_o_level_page() {
    let policy = AccessPolicy::education_levels([EducationLevel::OLevel]);
    let session = SessionState::signed_in(SessionUser::student(Some(EducationLevel::ALevel)));
    assert_eq!(evaluate(&policy, &session), redirect("/career-guidance"));
}

#[test]
fn test_scenario_resolved_anonymous_on_authenticated_page() {
    let session = SessionState {
        is_loading: false,
        user: None,
    };
    assert_eq!(
        evaluate(&AccessPolicy::Authenticated, &session),
        redirect("/auth")
    );
    assert_eq!(
        assess(&AccessPolicy::Authenticated, &session),
        GuardState::Unauthenticated
    );
}

#[test]
fn test_decision_wire_format() {
    let decision = evaluate(
        &AccessPolicy::roles([Role::Instructor, Role::Admin]),
        &SessionState::signed_in(SessionUser::new(Role::Student)),
    );
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["kind"], "render_denial_view");
    assert_eq!(json["allowed_roles"], serde_json::json!(["instructor", "admin"]));

    let json = serde_json::to_value(redirect(LOGIN_PATH)).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "redirect_to", "path": "/auth" }));
}
