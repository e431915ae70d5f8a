//! Screen table and navigation.
//!
//! Every protected screen goes through the same [`decide`] call; the only
//! per-screen data is the role list below.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::guard::{Decision, decide};
use crate::session::Session;
use crate::types::Role;

/// A screen of the admin client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Register,
    Dashboard,
    Users,
    Students,
    Subjects,
    /// A professional's own subjects.
    MySubjects,
    /// Grade entry for a professional's students.
    StudentGrades,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Login,
        Screen::Register,
        Screen::Dashboard,
        Screen::Users,
        Screen::Students,
        Screen::Subjects,
        Screen::MySubjects,
        Screen::StudentGrades,
    ];

    /// Short name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::Register => "register",
            Screen::Dashboard => "dashboard",
            Screen::Users => "users",
            Screen::Students => "students",
            Screen::Subjects => "subjects",
            Screen::MySubjects => "my-subjects",
            Screen::StudentGrades => "student-grades",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Screen::Login => "/login",
            Screen::Register => "/register",
            Screen::Dashboard => "/dashboard",
            Screen::Users => "/users",
            Screen::Students => "/students",
            Screen::Subjects => "/subjects",
            Screen::MySubjects => "/professional/subjects",
            Screen::StudentGrades => "/professional/grades",
        }
    }

    /// Roles allowed on this screen. Empty means any authenticated user.
    pub fn required_roles(self) -> &'static [Role] {
        match self {
            Screen::Login | Screen::Register | Screen::Dashboard => &[],
            Screen::Users => &[Role::Administrator],
            Screen::Students | Screen::Subjects => &[Role::Administrator, Role::Coordinator],
            Screen::MySubjects | Screen::StudentGrades => &[Role::Professional],
        }
    }

    /// Public screens are reachable without a session.
    pub fn is_public(self) -> bool {
        matches!(self, Screen::Login | Screen::Register)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Screen {
    type Err = Error;

    /// Accepts either the short name or the path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Screen::ALL
            .into_iter()
            .find(|screen| {
                screen.name().eq_ignore_ascii_case(wanted) || screen.path() == wanted
            })
            .ok_or_else(|| {
                InvalidInputError::Screen {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// Where a navigation ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Show the requested screen.
    Render(Screen),
    /// Show a neutral waiting state until the session settles.
    Wait,
    /// Go somewhere else instead.
    Redirect(Screen),
}

/// Resolve a navigation to `screen` against the current session.
///
/// Anonymous users go to the login screen; users lacking the role go back
/// to the dashboard.
pub fn navigate(session: &Session, screen: Screen) -> Destination {
    if screen.is_public() {
        return Destination::Render(screen);
    }
    match decide(session, screen.required_roles()) {
        Decision::Allow => Destination::Render(screen),
        Decision::Pending => Destination::Wait,
        Decision::RedirectLogin => Destination::Redirect(Screen::Login),
        Decision::RedirectUnauthorized => Destination::Redirect(Screen::Dashboard),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::identity;

    #[test]
    fn parses_names_and_paths() {
        assert_eq!("users".parse::<Screen>().unwrap(), Screen::Users);
        assert_eq!("My-Subjects".parse::<Screen>().unwrap(), Screen::MySubjects);
        assert_eq!(
            "/professional/grades".parse::<Screen>().unwrap(),
            Screen::StudentGrades
        );
        assert!("/admin".parse::<Screen>().is_err());
    }

    #[test]
    fn public_screens_render_for_anyone() {
        for session in [Session::bootstrapping(), Session::anonymous()] {
            assert_eq!(
                navigate(&session, Screen::Login),
                Destination::Render(Screen::Login)
            );
            assert_eq!(
                navigate(&session, Screen::Register),
                Destination::Render(Screen::Register)
            );
        }
    }

    #[test]
    fn protected_screens_follow_the_role_table() {
        let professional = Session::authenticated(identity(Role::Professional));
        let coordinator = Session::authenticated(identity(Role::Coordinator));
        let admin = Session::authenticated(identity(Role::Administrator));

        assert_eq!(
            navigate(&professional, Screen::Users),
            Destination::Redirect(Screen::Dashboard)
        );
        assert_eq!(
            navigate(&professional, Screen::StudentGrades),
            Destination::Render(Screen::StudentGrades)
        );
        assert_eq!(
            navigate(&coordinator, Screen::Students),
            Destination::Render(Screen::Students)
        );
        assert_eq!(
            navigate(&coordinator, Screen::Users),
            Destination::Redirect(Screen::Dashboard)
        );
        assert_eq!(
            navigate(&admin, Screen::MySubjects),
            Destination::Redirect(Screen::Dashboard)
        );
        for role in Role::ALL {
            let session = Session::authenticated(identity(role));
            assert_eq!(
                navigate(&session, Screen::Dashboard),
                Destination::Render(Screen::Dashboard)
            );
        }
    }

    #[test]
    fn unsettled_and_anonymous_sessions() {
        assert_eq!(
            navigate(&Session::bootstrapping(), Screen::Subjects),
            Destination::Wait
        );
        assert_eq!(
            navigate(&Session::anonymous(), Screen::Subjects),
            Destination::Redirect(Screen::Login)
        );
    }
}
