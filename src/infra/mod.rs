pub mod email {
    pub mod log_mailer;
}
pub mod factory;
pub mod repositories;
