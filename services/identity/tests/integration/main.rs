mod login_test;
mod router_test;
mod unlock_test;
