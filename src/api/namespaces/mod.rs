//! Per-namespace builders. Method lists here are configuration data, not
//! algorithmic complexity: every proxied method routes through the same
//! gateway, every event through the same relay.

pub mod action;
pub mod cookies;
pub mod i18n;
pub mod menus;
pub mod navigation;
pub mod notifications;
pub mod runtime;
pub mod storage;
pub mod tabs;
pub mod windows;
