pub trait CustomerInterface {
    fn get_id(&self) -> Option<i64>;
    fn get_email(&self) -> String;
    fn get_firstname(&self) -> String;
    fn get_addresses(&self) -> Vec<Box<dyn AddressInterface>>;
    fn get_default_billing(&self) -> Option<Box<dyn AddressInterface>>;
    fn get_extension_attributes(&self);
    fn set_email(&mut self, email: String);
}

pub trait AddressInterface {
    fn get_street(&self) -> Vec<String>;
    fn get_city(&self) -> String;
    fn get_region(&self) -> &dyn RegionInterface;
}

pub trait RegionInterface {
    fn get_region_code(&self) -> String;
    fn get_region_id(&self) -> u32;
}

pub trait CustomerRepositoryInterface {
    fn save(&self, customer: &dyn CustomerInterface, password_hash: Option<String>) -> Box<dyn CustomerInterface>;
    fn delete_by_id(&self, customer_id: i64) -> bool;
    fn get_current(&self) -> Box<dyn CustomerInterface>;
}

pub trait AccountManagementInterface {
    fn create_account(
        &self,
        customer: &dyn CustomerInterface,
        password: Option<String>,
        redirect_url: &str,
    ) -> Box<dyn CustomerInterface>;
}
