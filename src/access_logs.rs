mod access_log;
mod access_log_action;
mod access_logs_filter;
mod api_ext;

pub use self::{
    access_log::AccessLog,
    access_log_action::AccessLogAction,
    access_logs_filter::{AccessLogsFilter, AccessLogsQuery},
};
