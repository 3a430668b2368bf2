mod dns_resolver_test;
