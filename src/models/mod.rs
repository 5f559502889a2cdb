pub mod subscriptionmodel;
