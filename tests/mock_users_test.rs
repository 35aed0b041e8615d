use actor_context::users::{MemoryUsers, MockUsers, NewUser, User, Users, UsersListOptions};
use actor_context::{DirectoryError, ErrorKind, RequestContext};

fn user_x() -> User {
    User {
        id: 7,
        username: "userx".to_string(),
        display_name: Some("User X".to_string()),
        external: None,
        site_admin: false,
    }
}

#[test]
fn get_by_id_return_answers_any_id() {
    let mut users = MockUsers::new();
    let called = users.mock_get_by_id_return(Ok(user_x()));
    let ctx = RequestContext::new("req-1");

    assert!(!called.was_called());

    for id in [0, 1, 7, -3, i32::MAX] {
        assert_eq!(users.get_by_id(&ctx, id), Ok(user_x()));
    }
    assert!(called.was_called());
}

#[test]
fn get_by_external_id_not_found_scenario() {
    let mut users = MockUsers::new();
    let by_id = users.mock_get_by_id_return(Ok(user_x()));
    let by_external = users.mock_get_by_external_id_return(Err(DirectoryError::not_found(
        "no user for external account github:abc",
    )));
    let ctx = RequestContext::new("req-2");

    let result = users.get_by_external_id(&ctx, "github", "abc");

    let err = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "no user for external account github:abc");
    assert!(by_external.was_called());
    assert!(!by_id.was_called());
}

#[test]
fn overrides_cover_every_operation() {
    let mut users = MockUsers::new();
    users
        .on_create(|_, info| {
            Ok(User {
                username: info.username,
                ..user_x()
            })
        })
        .on_get_by_username(|_, name| {
            if name == "userx" {
                Ok(user_x())
            } else {
                Err(DirectoryError::not_found(name))
            }
        })
        .on_count(|_, _| Ok(0))
        .on_list(|_, opt| {
            assert!(opt.is_none());
            Ok(vec![user_x()])
        })
        .on_list_by_org(|_, org_id, ids, names| {
            assert_eq!(org_id, 3);
            assert_eq!(ids, &[7]);
            assert!(names.is_empty());
            Ok(vec![user_x()])
        });
    let ctx = RequestContext::new("req-3");

    assert_eq!(users.create(&ctx, NewUser::new("fresh")).unwrap().username, "fresh");
    assert_eq!(users.get_by_username(&ctx, "userx"), Ok(user_x()));
    assert!(users.get_by_username(&ctx, "other").unwrap_err().is_not_found());
    assert_eq!(users.count(&ctx, &UsersListOptions::new()), Ok(0));
    assert_eq!(users.list(&ctx, None).unwrap().len(), 1);
    assert_eq!(users.list_by_org(&ctx, 3, &[7], &[]).unwrap(), vec![user_x()]);
}

#[test]
fn misconfiguration_is_not_a_not_found() {
    let users = MockUsers::new();
    let ctx = RequestContext::new("req-4");

    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        users.get_by_external_id(&ctx, "github", "abc")
    }));

    assert!(outcome.is_err(), "unset operation must fail loudly");
}

#[test]
fn fallback_supplies_unmocked_operations() {
    let ctx = RequestContext::new("req-5");
    let backing = MemoryUsers::new();
    backing.create(&ctx, NewUser::new("alice")).unwrap();
    backing.create(&ctx, NewUser::new("bob")).unwrap();

    let mut users = MockUsers::with_fallback(backing);
    users.on_count(|_, _| Err(DirectoryError::unavailable("replica down")));

    assert_eq!(users.list(&ctx, None).unwrap().len(), 2);
    assert_eq!(
        users.count(&ctx, &UsersListOptions::new()).unwrap_err().kind(),
        ErrorKind::Unavailable
    );
}
