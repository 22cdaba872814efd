use crate::domain::{Role, Session};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const OTP_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoginStep {
    RoleUnset,
    RoleSelected,
    OtpRequested,
}

/// Role choice, phone entry, and a stand-in OTP check. Any six digits pass.
#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    role: Option<Role>,
    phone: String,
    otp_sent: bool,
    otp: String,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> LoginStep {
        match (self.role, self.otp_sent) {
            (_, true) => LoginStep::OtpRequested,
            (Some(_), false) => LoginStep::RoleSelected,
            (None, false) => LoginStep::RoleUnset,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn otp(&self) -> &str {
        &self.otp
    }

    pub fn otp_sent(&self) -> bool {
        self.otp_sent
    }

    pub fn select_role(&mut self, role: Role) {
        if self.otp_sent {
            return;
        }
        self.role = Some(role);
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        if self.otp_sent {
            return;
        }
        self.phone = phone.into();
    }

    pub fn push_phone_char(&mut self, c: char) {
        if !self.otp_sent {
            self.phone.push(c);
        }
    }

    pub fn pop_phone_char(&mut self) {
        if !self.otp_sent {
            self.phone.pop();
        }
    }

    pub fn can_send_otp(&self) -> bool {
        self.role.is_some() && !self.phone.is_empty()
    }

    /// Flips to OTP entry. Nothing is delivered anywhere.
    pub fn send_otp(&mut self) -> bool {
        if self.otp_sent || !self.can_send_otp() {
            return false;
        }
        self.otp_sent = true;
        info!("OTP requested for {}", self.phone);
        true
    }

    /// Replaces the OTP value, keeping only digits and at most six of them.
    pub fn set_otp(&mut self, raw: &str) {
        self.otp = raw.chars().filter(|c| c.is_ascii_digit()).take(OTP_LEN).collect();
    }

    pub fn push_otp_char(&mut self, c: char) {
        let mut raw = std::mem::take(&mut self.otp);
        raw.push(c);
        self.set_otp(&raw);
    }

    pub fn pop_otp_char(&mut self) {
        self.otp.pop();
    }

    pub fn can_verify(&self) -> bool {
        self.otp_sent && self.otp.len() == OTP_LEN && self.otp.chars().all(|c| c.is_ascii_digit())
    }

    pub fn verify_otp(&self) -> Option<Session> {
        if !self.can_verify() {
            debug!("OTP rejected ({} digits)", self.otp.len());
            return None;
        }
        let role = self.role?;
        info!("OTP accepted for {} as {}", self.phone, role);
        Some(Session {
            role,
            phone: self.phone.clone(),
        })
    }

    pub fn back_to_phone_entry(&mut self) {
        self.otp_sent = false;
        self.otp.clear();
    }
}
