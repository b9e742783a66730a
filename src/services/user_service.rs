use uuid::Uuid;
use validator::Validate;

use crate::{
    domain::user::User,
    dto::user::{CreateUserRequest, UserView},
    error::ServiceError,
    state::SharedState,
};

/// Create a user from the request payload.
pub fn create_user(
    state: &SharedState,
    request: CreateUserRequest,
) -> Result<UserView, ServiceError> {
    request.validate()?;
    let user = User {
        id: Uuid::new_v4(),
        name: request.name,
        eic: request.eic,
        editor: request.editor,
        testsolve_coordinator: request.testsolve_coordinator,
        capabilities: request.capabilities,
    };
    let view = UserView::from(user.clone());
    state.store().put_user(user);
    Ok(view)
}

/// List all registered users.
pub fn list_users(state: &SharedState) -> Vec<UserView> {
    let mut users = state.store().users();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    users.into_iter().map(UserView::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, state::AppState};
    use std::collections::BTreeSet;

    #[test]
    fn created_users_are_listed_sorted() {
        let state = AppState::new(AppConfig::default());
        for name in ["zoe", "ada"] {
            create_user(
                &state,
                CreateUserRequest {
                    name: name.into(),
                    eic: false,
                    editor: false,
                    testsolve_coordinator: false,
                    capabilities: BTreeSet::new(),
                },
            )
            .expect("create");
        }
        let names: Vec<String> = list_users(&state).into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["ada".to_owned(), "zoe".to_owned()]);
    }

    #[test]
    fn empty_names_are_rejected() {
        let state = AppState::new(AppConfig::default());
        let err = create_user(
            &state,
            CreateUserRequest {
                name: String::new(),
                eic: false,
                editor: false,
                testsolve_coordinator: false,
                capabilities: BTreeSet::new(),
            },
        );
        assert!(matches!(err, Err(ServiceError::InvalidInput(_))));
    }
}
