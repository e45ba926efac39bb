//! Integration tests for the crawler
//!
//! `crawl_tests` drives `Crawler` against an instrumented in-memory web;
//! `http_tests` drives the HTTP downloader against wiremock servers.

mod http_tests;
mod support;
