mod target_url_test;
