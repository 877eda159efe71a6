//! Test module for app-shell
