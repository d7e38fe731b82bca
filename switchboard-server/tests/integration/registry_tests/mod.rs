mod test_register_unregister;
