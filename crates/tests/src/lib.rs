#[cfg(test)]
mod common;

#[cfg(test)]
mod sync_user_tests;

#[cfg(test)]
mod profile_tests;

#[cfg(test)]
mod admin_tests;

#[cfg(test)]
mod rate_limit_tests;
