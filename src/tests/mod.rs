mod content_moderator_tests;
mod sanitizer_tests;
