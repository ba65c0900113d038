// Analysis: prompt building, oracle calls, validation, memoization, ranking.
// All oracle calls go through oracle::Oracle; no direct HTTP calls here.

pub mod batch;
pub mod handlers;
pub mod memo;
pub mod prompts;
pub mod ranking;
pub mod requests;
pub mod service;
pub mod validator;
