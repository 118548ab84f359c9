pub mod login_guard;
