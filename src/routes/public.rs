use super::Route;

/// Public Route Module
///
/// Pages any visitor may open. These paths become the guard's exemption set,
/// so navigating to them never contacts the authority.
///
/// The login page must stay in this list: it is where denied navigations are
/// sent, and a protected login page would redirect forever.
pub fn public_routes() -> Vec<Route> {
    vec![
        // /login
        // Credential entry. Also the redirect target for every denial.
        Route::view("/login", "LoginPage").public(),
        // /register
        // Account creation for visitors without a session.
        Route::view("/register", "RegisterPage").public(),
    ]
}
