use super::Route;

/// Authenticated Route Module
///
/// Pages rendered inside the main layout. None of them is exempt: entering any
/// of these costs one authorization probe.
pub fn authenticated_routes() -> Vec<Route> {
    vec![
        // / and /index
        // Landing page.
        Route::view("/", "IndexPage"),
        Route::view("/index", "IndexPage"),
        // /account
        // Profile of the signed-in user.
        Route::view("/account", "AccountPage"),
        // /workouts and /diets
        // Listings of the user's plans.
        Route::view("/workouts", "WorkoutsPage"),
        Route::view("/diets", "DietsPage"),
        // /WorkoutSet/:wSet
        // A single workout set, keyed by the `wSet` segment.
        Route::view("/WorkoutSet/:wSet", "WorkoutSet"),
        // /DietDay/:dDay
        // A single diet day, keyed by the `dDay` segment.
        Route::view("/DietDay/:dDay", "DietDay"),
    ]
}
