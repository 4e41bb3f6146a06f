//! Field positions of the EnergyPlus object types this crate reads or
//! writes. Index 0 is the first field after the object type.

macro_rules! idf_fields {
    ($module:ident, $object_type:literal, { $($field:ident => $label:literal),* $(,)? }) => {
        pub mod $module {
            pub const OBJECT_TYPE: &str = $object_type;
            pub const LABELS: &[&str] = &[$($label),*];
            idf_fields!(@index 0usize; $($field),*);
        }
    };
    (@index $n:expr; ) => {};
    (@index $n:expr; $head:ident $(, $tail:ident)*) => {
        pub const $head: usize = $n;
        idf_fields!(@index $n + 1usize; $($tail),*);
    };
}

// ---------------------------------------------------------------------------
// Schedules and curves
// ---------------------------------------------------------------------------

idf_fields!(schedule_type_limits, "ScheduleTypeLimits", {
    NAME => "Name",
    LOWER_LIMIT => "Lower Limit Value",
    UPPER_LIMIT => "Upper Limit Value",
    NUMERIC_TYPE => "Numeric Type",
    UNIT_TYPE => "Unit Type",
});

idf_fields!(schedule_constant, "Schedule:Constant", {
    NAME => "Name",
    SCHEDULE_TYPE_LIMITS => "Schedule Type Limits Name",
    HOURLY_VALUE => "Hourly Value",
});

idf_fields!(curve_cubic, "Curve:Cubic", {
    NAME => "Name",
    C1 => "Coefficient1 Constant",
    C2 => "Coefficient2 x",
    C3 => "Coefficient3 x**2",
    C4 => "Coefficient4 x**3",
    MINIMUM_X => "Minimum Value of x",
    MAXIMUM_X => "Maximum Value of x",
});

idf_fields!(curve_quadratic, "Curve:Quadratic", {
    NAME => "Name",
    C1 => "Coefficient1 Constant",
    C2 => "Coefficient2 x",
    C3 => "Coefficient3 x**2",
    MINIMUM_X => "Minimum Value of x",
    MAXIMUM_X => "Maximum Value of x",
});

idf_fields!(curve_biquadratic, "Curve:Biquadratic", {
    NAME => "Name",
    C1 => "Coefficient1 Constant",
    C2 => "Coefficient2 x",
    C3 => "Coefficient3 x**2",
    C4 => "Coefficient4 y",
    C5 => "Coefficient5 y**2",
    C6 => "Coefficient6 x*y",
    MINIMUM_X => "Minimum Value of x",
    MAXIMUM_X => "Maximum Value of x",
    MINIMUM_Y => "Minimum Value of y",
    MAXIMUM_Y => "Maximum Value of y",
});

// ---------------------------------------------------------------------------
// Setpoint managers
// ---------------------------------------------------------------------------

idf_fields!(setpoint_manager_scheduled, "SetpointManager:Scheduled", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    SCHEDULE => "Schedule Name",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
});

idf_fields!(setpoint_manager_single_zone_reheat, "SetpointManager:SingleZone:Reheat", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    MINIMUM_SUPPLY_AIR_TEMPERATURE => "Minimum Supply Air Temperature",
    MAXIMUM_SUPPLY_AIR_TEMPERATURE => "Maximum Supply Air Temperature",
    CONTROL_ZONE => "Control Zone Name",
    ZONE_NODE => "Zone Node Name",
    ZONE_INLET_NODE => "Zone Inlet Node Name",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
});

idf_fields!(setpoint_manager_mixed_air, "SetpointManager:MixedAir", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    REFERENCE_SETPOINT_NODE => "Reference Setpoint Node Name",
    FAN_INLET_NODE => "Fan Inlet Node Name",
    FAN_OUTLET_NODE => "Fan Outlet Node Name",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
});

idf_fields!(setpoint_manager_outdoor_air_reset, "SetpointManager:OutdoorAirReset", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    SETPOINT_AT_OUTDOOR_LOW => "Setpoint at Outdoor Low Temperature",
    OUTDOOR_LOW => "Outdoor Low Temperature",
    SETPOINT_AT_OUTDOOR_HIGH => "Setpoint at Outdoor High Temperature",
    OUTDOOR_HIGH => "Outdoor High Temperature",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
    SCHEDULE => "Schedule Name",
    SETPOINT_AT_OUTDOOR_LOW_2 => "Setpoint at Outdoor Low Temperature 2",
    OUTDOOR_LOW_2 => "Outdoor Low Temperature 2",
    SETPOINT_AT_OUTDOOR_HIGH_2 => "Setpoint at Outdoor High Temperature 2",
    OUTDOOR_HIGH_2 => "Outdoor High Temperature 2",
});

idf_fields!(setpoint_manager_follow_outdoor_air_temperature, "SetpointManager:FollowOutdoorAirTemperature", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    REFERENCE_TEMPERATURE_TYPE => "Reference Temperature Type",
    OFFSET_TEMPERATURE_DIFFERENCE => "Offset Temperature Difference",
    MAXIMUM_SETPOINT_TEMPERATURE => "Maximum Setpoint Temperature",
    MINIMUM_SETPOINT_TEMPERATURE => "Minimum Setpoint Temperature",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
});

idf_fields!(setpoint_manager_warmest, "SetpointManager:Warmest", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    AIR_LOOP => "HVAC Air Loop Name",
    MINIMUM_SETPOINT_TEMPERATURE => "Minimum Setpoint Temperature",
    MAXIMUM_SETPOINT_TEMPERATURE => "Maximum Setpoint Temperature",
    STRATEGY => "Strategy",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
});

idf_fields!(setpoint_manager_warmest_temperature_flow, "SetpointManager:WarmestTemperatureFlow", {
    NAME => "Name",
    CONTROL_VARIABLE => "Control Variable",
    AIR_LOOP => "HVAC Air Loop Name",
    MINIMUM_SETPOINT_TEMPERATURE => "Minimum Setpoint Temperature",
    MAXIMUM_SETPOINT_TEMPERATURE => "Maximum Setpoint Temperature",
    STRATEGY => "Strategy",
    SETPOINT_NODE => "Setpoint Node or NodeList Name",
    MINIMUM_TURNDOWN_RATIO => "Minimum Turndown Ratio",
});

// ---------------------------------------------------------------------------
// Air-side components
// ---------------------------------------------------------------------------

idf_fields!(heat_exchanger_air_to_air_sensible_and_latent, "HeatExchanger:AirToAir:SensibleAndLatent", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    NOMINAL_SUPPLY_AIR_FLOW_RATE => "Nominal Supply Air Flow Rate",
    SENSIBLE_EFFECTIVENESS_100_HEATING => "Sensible Effectiveness at 100% Heating Air Flow",
    LATENT_EFFECTIVENESS_100_HEATING => "Latent Effectiveness at 100% Heating Air Flow",
    SENSIBLE_EFFECTIVENESS_75_HEATING => "Sensible Effectiveness at 75% Heating Air Flow",
    LATENT_EFFECTIVENESS_75_HEATING => "Latent Effectiveness at 75% Heating Air Flow",
    SENSIBLE_EFFECTIVENESS_100_COOLING => "Sensible Effectiveness at 100% Cooling Air Flow",
    LATENT_EFFECTIVENESS_100_COOLING => "Latent Effectiveness at 100% Cooling Air Flow",
    SENSIBLE_EFFECTIVENESS_75_COOLING => "Sensible Effectiveness at 75% Cooling Air Flow",
    LATENT_EFFECTIVENESS_75_COOLING => "Latent Effectiveness at 75% Cooling Air Flow",
    SUPPLY_AIR_INLET_NODE => "Supply Air Inlet Node Name",
    SUPPLY_AIR_OUTLET_NODE => "Supply Air Outlet Node Name",
    EXHAUST_AIR_INLET_NODE => "Exhaust Air Inlet Node Name",
    EXHAUST_AIR_OUTLET_NODE => "Exhaust Air Outlet Node Name",
    NOMINAL_ELECTRIC_POWER => "Nominal Electric Power",
    SUPPLY_AIR_OUTLET_TEMPERATURE_CONTROL => "Supply Air Outlet Temperature Control",
    HEAT_EXCHANGER_TYPE => "Heat Exchanger Type",
    FROST_CONTROL_TYPE => "Frost Control Type",
    THRESHOLD_TEMPERATURE => "Threshold Temperature",
    INITIAL_DEFROST_TIME_FRACTION => "Initial Defrost Time Fraction",
    RATE_OF_DEFROST_TIME_FRACTION_INCREASE => "Rate of Defrost Time Fraction Increase",
    ECONOMIZER_LOCKOUT => "Economizer Lockout",
});

idf_fields!(fan_constant_volume, "Fan:ConstantVolume", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    FAN_TOTAL_EFFICIENCY => "Fan Total Efficiency",
    PRESSURE_RISE => "Pressure Rise",
    MAXIMUM_FLOW_RATE => "Maximum Flow Rate",
    MOTOR_EFFICIENCY => "Motor Efficiency",
    MOTOR_IN_AIRSTREAM_FRACTION => "Motor In Airstream Fraction",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
});

idf_fields!(fan_variable_volume, "Fan:VariableVolume", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    FAN_TOTAL_EFFICIENCY => "Fan Total Efficiency",
    PRESSURE_RISE => "Pressure Rise",
    MAXIMUM_FLOW_RATE => "Maximum Flow Rate",
    MINIMUM_FLOW_RATE_INPUT_METHOD => "Fan Power Minimum Flow Rate Input Method",
    MINIMUM_FLOW_FRACTION => "Fan Power Minimum Flow Fraction",
    MINIMUM_AIR_FLOW_RATE => "Fan Power Minimum Air Flow Rate",
    MOTOR_EFFICIENCY => "Motor Efficiency",
    MOTOR_IN_AIRSTREAM_FRACTION => "Motor In Airstream Fraction",
    COEFFICIENT_1 => "Fan Power Coefficient 1",
    COEFFICIENT_2 => "Fan Power Coefficient 2",
    COEFFICIENT_3 => "Fan Power Coefficient 3",
    COEFFICIENT_4 => "Fan Power Coefficient 4",
    COEFFICIENT_5 => "Fan Power Coefficient 5",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
});

idf_fields!(coil_cooling_dx_single_speed, "Coil:Cooling:DX:SingleSpeed", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    GROSS_RATED_TOTAL_COOLING_CAPACITY => "Gross Rated Total Cooling Capacity",
    GROSS_RATED_SENSIBLE_HEAT_RATIO => "Gross Rated Sensible Heat Ratio",
    GROSS_RATED_COOLING_COP => "Gross Rated Cooling COP",
    RATED_AIR_FLOW_RATE => "Rated Air Flow Rate",
    RATED_EVAPORATOR_FAN_POWER => "Rated Evaporator Fan Power Per Volume Flow Rate",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
    TOTAL_COOLING_CAPACITY_F_TEMPERATURE => "Total Cooling Capacity Function of Temperature Curve Name",
    TOTAL_COOLING_CAPACITY_F_FLOW => "Total Cooling Capacity Function of Flow Fraction Curve Name",
    EIR_F_TEMPERATURE => "Energy Input Ratio Function of Temperature Curve Name",
    EIR_F_FLOW => "Energy Input Ratio Function of Flow Fraction Curve Name",
    PART_LOAD_FRACTION_CORRELATION => "Part Load Fraction Correlation Curve Name",
});

idf_fields!(coil_heating_fuel, "Coil:Heating:Fuel", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    FUEL_TYPE => "Fuel Type",
    BURNER_EFFICIENCY => "Burner Efficiency",
    NOMINAL_CAPACITY => "Nominal Capacity",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
    TEMPERATURE_SETPOINT_NODE => "Temperature Setpoint Node Name",
    PARASITIC_ELECTRIC_LOAD => "On Cycle Parasitic Electric Load",
});

idf_fields!(coil_heating_electric, "Coil:Heating:Electric", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    EFFICIENCY => "Efficiency",
    NOMINAL_CAPACITY => "Nominal Capacity",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
});

idf_fields!(coil_heating_water, "Coil:Heating:Water", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    U_FACTOR_TIMES_AREA => "U-Factor Times Area Value",
    MAXIMUM_WATER_FLOW_RATE => "Maximum Water Flow Rate",
    WATER_INLET_NODE => "Water Inlet Node Name",
    WATER_OUTLET_NODE => "Water Outlet Node Name",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
    PERFORMANCE_INPUT_METHOD => "Performance Input Method",
    RATED_CAPACITY => "Rated Capacity",
    RATED_INLET_WATER_TEMPERATURE => "Rated Inlet Water Temperature",
    RATED_INLET_AIR_TEMPERATURE => "Rated Inlet Air Temperature",
    RATED_OUTLET_WATER_TEMPERATURE => "Rated Outlet Water Temperature",
    RATED_OUTLET_AIR_TEMPERATURE => "Rated Outlet Air Temperature",
});

idf_fields!(coil_cooling_water, "Coil:Cooling:Water", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    DESIGN_WATER_FLOW_RATE => "Design Water Flow Rate",
    DESIGN_AIR_FLOW_RATE => "Design Air Flow Rate",
    DESIGN_INLET_WATER_TEMPERATURE => "Design Inlet Water Temperature",
    DESIGN_INLET_AIR_TEMPERATURE => "Design Inlet Air Temperature",
    DESIGN_OUTLET_AIR_TEMPERATURE => "Design Outlet Air Temperature",
    DESIGN_INLET_AIR_HUMIDITY_RATIO => "Design Inlet Air Humidity Ratio",
    DESIGN_OUTLET_AIR_HUMIDITY_RATIO => "Design Outlet Air Humidity Ratio",
    WATER_INLET_NODE => "Water Inlet Node Name",
    WATER_OUTLET_NODE => "Water Outlet Node Name",
    AIR_INLET_NODE => "Air Inlet Node Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
});

idf_fields!(air_terminal_uncontrolled, "AirTerminal:SingleDuct:Uncontrolled", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    ZONE_SUPPLY_AIR_NODE => "Zone Supply Air Node Name",
    MAXIMUM_AIR_FLOW_RATE => "Maximum Air Flow Rate",
});

idf_fields!(air_terminal_vav_reheat, "AirTerminal:SingleDuct:VAV:Reheat", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    DAMPER_AIR_OUTLET_NODE => "Damper Air Outlet Node Name",
    AIR_INLET_NODE => "Air Inlet Node Name",
    MAXIMUM_AIR_FLOW_RATE => "Maximum Air Flow Rate",
    ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD => "Zone Minimum Air Flow Input Method",
    CONSTANT_MINIMUM_AIR_FLOW_FRACTION => "Constant Minimum Air Flow Fraction",
    FIXED_MINIMUM_AIR_FLOW_RATE => "Fixed Minimum Air Flow Rate",
    MINIMUM_AIR_FLOW_FRACTION_SCHEDULE => "Minimum Air Flow Fraction Schedule Name",
    REHEAT_COIL_OBJECT_TYPE => "Reheat Coil Object Type",
    REHEAT_COIL => "Reheat Coil Name",
    MAXIMUM_HOT_WATER_FLOW_RATE => "Maximum Hot Water or Steam Flow Rate",
    MINIMUM_HOT_WATER_FLOW_RATE => "Minimum Hot Water or Steam Flow Rate",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
});

idf_fields!(air_terminal_vav_no_reheat, "AirTerminal:SingleDuct:VAV:NoReheat", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    AIR_OUTLET_NODE => "Air Outlet Node Name",
    AIR_INLET_NODE => "Air Inlet Node Name",
    MAXIMUM_AIR_FLOW_RATE => "Maximum Air Flow Rate",
    ZONE_MINIMUM_AIR_FLOW_INPUT_METHOD => "Zone Minimum Air Flow Input Method",
    CONSTANT_MINIMUM_AIR_FLOW_FRACTION => "Constant Minimum Air Flow Fraction",
});

// ---------------------------------------------------------------------------
// Zone equipment
// ---------------------------------------------------------------------------

idf_fields!(zone_hvac_baseboard_convective_electric, "ZoneHVAC:Baseboard:Convective:Electric", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    HEATING_DESIGN_CAPACITY_METHOD => "Heating Design Capacity Method",
    HEATING_DESIGN_CAPACITY => "Heating Design Capacity",
    HEATING_DESIGN_CAPACITY_PER_FLOOR_AREA => "Heating Design Capacity Per Floor Area",
    FRACTION_OF_AUTOSIZED_HEATING_DESIGN_CAPACITY => "Fraction of Autosized Heating Design Capacity",
    EFFICIENCY => "Efficiency",
});

idf_fields!(zone_hvac_baseboard_convective_water, "ZoneHVAC:Baseboard:Convective:Water", {
    NAME => "Name",
    AVAILABILITY_SCHEDULE => "Availability Schedule Name",
    INLET_NODE => "Inlet Node Name",
    OUTLET_NODE => "Outlet Node Name",
    HEATING_DESIGN_CAPACITY_METHOD => "Heating Design Capacity Method",
    HEATING_DESIGN_CAPACITY => "Heating Design Capacity",
    HEATING_DESIGN_CAPACITY_PER_FLOOR_AREA => "Heating Design Capacity Per Floor Area",
    FRACTION_OF_AUTOSIZED_HEATING_DESIGN_CAPACITY => "Fraction of Autosized Heating Design Capacity",
    U_FACTOR_TIMES_AREA => "U-Factor Times Area Value",
    MAXIMUM_WATER_FLOW_RATE => "Maximum Water Flow Rate",
    CONVERGENCE_TOLERANCE => "Convergence Tolerance",
});

// Followed by groups of ZONE_EQUIPMENT_GROUP.
idf_fields!(zone_hvac_equipment_list, "ZoneHVAC:EquipmentList", {
    NAME => "Name",
    LOAD_DISTRIBUTION_SCHEME => "Load Distribution Scheme",
});

idf_fields!(zone_hvac_equipment_connections, "ZoneHVAC:EquipmentConnections", {
    ZONE => "Zone Name",
    EQUIPMENT_LIST => "Zone Conditioning Equipment List Name",
    AIR_INLET_NODE => "Zone Air Inlet Node or NodeList Name",
    AIR_EXHAUST_NODE => "Zone Air Exhaust Node or NodeList Name",
    AIR_NODE => "Zone Air Node Name",
    RETURN_AIR_NODE => "Zone Return Air Node or NodeList Name",
});

// ---------------------------------------------------------------------------
// Plant components
// ---------------------------------------------------------------------------

idf_fields!(pump_constant_speed, "Pump:ConstantSpeed", {
    NAME => "Name",
    INLET_NODE => "Inlet Node Name",
    OUTLET_NODE => "Outlet Node Name",
    DESIGN_FLOW_RATE => "Design Flow Rate",
    DESIGN_PUMP_HEAD => "Design Pump Head",
    DESIGN_POWER_CONSUMPTION => "Design Power Consumption",
    MOTOR_EFFICIENCY => "Motor Efficiency",
    FRACTION_OF_MOTOR_INEFFICIENCIES_TO_FLUID => "Fraction of Motor Inefficiencies to Fluid Stream",
    PUMP_CONTROL_TYPE => "Pump Control Type",
});

idf_fields!(pump_variable_speed, "Pump:VariableSpeed", {
    NAME => "Name",
    INLET_NODE => "Inlet Node Name",
    OUTLET_NODE => "Outlet Node Name",
    DESIGN_MAXIMUM_FLOW_RATE => "Design Maximum Flow Rate",
    DESIGN_PUMP_HEAD => "Design Pump Head",
    DESIGN_POWER_CONSUMPTION => "Design Power Consumption",
    MOTOR_EFFICIENCY => "Motor Efficiency",
    FRACTION_OF_MOTOR_INEFFICIENCIES_TO_FLUID => "Fraction of Motor Inefficiencies to Fluid Stream",
    COEFFICIENT_1 => "Coefficient 1 of the Part Load Performance Curve",
    COEFFICIENT_2 => "Coefficient 2 of the Part Load Performance Curve",
    COEFFICIENT_3 => "Coefficient 3 of the Part Load Performance Curve",
    COEFFICIENT_4 => "Coefficient 4 of the Part Load Performance Curve",
    DESIGN_MINIMUM_FLOW_RATE => "Design Minimum Flow Rate",
    PUMP_CONTROL_TYPE => "Pump Control Type",
});

idf_fields!(boiler_hot_water, "Boiler:HotWater", {
    NAME => "Name",
    FUEL_TYPE => "Fuel Type",
    NOMINAL_CAPACITY => "Nominal Capacity",
    NOMINAL_THERMAL_EFFICIENCY => "Nominal Thermal Efficiency",
    EFFICIENCY_CURVE_TEMPERATURE_EVALUATION_VARIABLE => "Efficiency Curve Temperature Evaluation Variable",
    NORMALIZED_BOILER_EFFICIENCY_CURVE => "Normalized Boiler Efficiency Curve Name",
    DESIGN_WATER_FLOW_RATE => "Design Water Flow Rate",
    MINIMUM_PART_LOAD_RATIO => "Minimum Part Load Ratio",
    MAXIMUM_PART_LOAD_RATIO => "Maximum Part Load Ratio",
    OPTIMUM_PART_LOAD_RATIO => "Optimum Part Load Ratio",
    WATER_INLET_NODE => "Boiler Water Inlet Node Name",
    WATER_OUTLET_NODE => "Boiler Water Outlet Node Name",
    WATER_OUTLET_UPPER_TEMPERATURE_LIMIT => "Water Outlet Upper Temperature Limit",
    BOILER_FLOW_MODE => "Boiler Flow Mode",
    PARASITIC_ELECTRIC_LOAD => "Parasitic Electric Load",
});

idf_fields!(chiller_electric_eir, "Chiller:Electric:EIR", {
    NAME => "Name",
    REFERENCE_CAPACITY => "Reference Capacity",
    REFERENCE_COP => "Reference COP",
    REFERENCE_LEAVING_CHILLED_WATER_TEMPERATURE => "Reference Leaving Chilled Water Temperature",
    REFERENCE_ENTERING_CONDENSER_FLUID_TEMPERATURE => "Reference Entering Condenser Fluid Temperature",
    REFERENCE_CHILLED_WATER_FLOW_RATE => "Reference Chilled Water Flow Rate",
    REFERENCE_CONDENSER_FLUID_FLOW_RATE => "Reference Condenser Fluid Flow Rate",
    COOLING_CAPACITY_F_TEMPERATURE => "Cooling Capacity Function of Temperature Curve Name",
    EIR_F_TEMPERATURE => "Electric Input to Cooling Output Ratio Function of Temperature Curve Name",
    EIR_F_PART_LOAD_RATIO => "Electric Input to Cooling Output Ratio Function of Part Load Ratio Curve Name",
    MINIMUM_PART_LOAD_RATIO => "Minimum Part Load Ratio",
    MAXIMUM_PART_LOAD_RATIO => "Maximum Part Load Ratio",
    OPTIMUM_PART_LOAD_RATIO => "Optimum Part Load Ratio",
    MINIMUM_UNLOADING_RATIO => "Minimum Unloading Ratio",
    CHILLED_WATER_INLET_NODE => "Chilled Water Inlet Node Name",
    CHILLED_WATER_OUTLET_NODE => "Chilled Water Outlet Node Name",
    CONDENSER_INLET_NODE => "Condenser Inlet Node Name",
    CONDENSER_OUTLET_NODE => "Condenser Outlet Node Name",
    CONDENSER_TYPE => "Condenser Type",
});

idf_fields!(cooling_tower_single_speed, "CoolingTower:SingleSpeed", {
    NAME => "Name",
    WATER_INLET_NODE => "Water Inlet Node Name",
    WATER_OUTLET_NODE => "Water Outlet Node Name",
    DESIGN_WATER_FLOW_RATE => "Design Water Flow Rate",
    DESIGN_AIR_FLOW_RATE => "Design Air Flow Rate",
    DESIGN_FAN_POWER => "Design Fan Power",
    DESIGN_U_FACTOR_TIMES_AREA => "Design U-Factor Times Area Value",
});

idf_fields!(pipe_adiabatic, "Pipe:Adiabatic", {
    NAME => "Name",
    INLET_NODE => "Inlet Node Name",
    OUTLET_NODE => "Outlet Node Name",
});

// ---------------------------------------------------------------------------
// Zones, loops and outdoor air
// ---------------------------------------------------------------------------

idf_fields!(zone, "Zone", {
    NAME => "Name",
    DIRECTION_OF_RELATIVE_NORTH => "Direction of Relative North",
    X_ORIGIN => "X Origin",
    Y_ORIGIN => "Y Origin",
    Z_ORIGIN => "Z Origin",
    TYPE => "Type",
    MULTIPLIER => "Multiplier",
    CEILING_HEIGHT => "Ceiling Height",
    VOLUME => "Volume",
    FLOOR_AREA => "Floor Area",
});

idf_fields!(air_loop_hvac, "AirLoopHVAC", {
    NAME => "Name",
    CONTROLLER_LIST => "Controller List Name",
    AVAILABILITY_MANAGER_LIST => "Availability Manager List Name",
    DESIGN_SUPPLY_AIR_FLOW_RATE => "Design Supply Air Flow Rate",
    BRANCH_LIST => "Branch List Name",
    CONNECTOR_LIST => "Connector List Name",
    SUPPLY_SIDE_INLET_NODE => "Supply Side Inlet Node Name",
    DEMAND_SIDE_OUTLET_NODE => "Demand Side Outlet Node Name",
    DEMAND_SIDE_INLET_NODES => "Demand Side Inlet Node Names",
    SUPPLY_SIDE_OUTLET_NODES => "Supply Side Outlet Node Names",
});

idf_fields!(sizing_system, "Sizing:System", {
    AIR_LOOP => "AirLoop Name",
    TYPE_OF_LOAD_TO_SIZE_ON => "Type of Load to Size On",
    DESIGN_OUTDOOR_AIR_FLOW_RATE => "Design Outdoor Air Flow Rate",
    CENTRAL_HEATING_MAXIMUM_SYSTEM_AIR_FLOW_RATIO => "Central Heating Maximum System Air Flow Ratio",
    PREHEAT_DESIGN_TEMPERATURE => "Preheat Design Temperature",
    PREHEAT_DESIGN_HUMIDITY_RATIO => "Preheat Design Humidity Ratio",
    PRECOOL_DESIGN_TEMPERATURE => "Precool Design Temperature",
    PRECOOL_DESIGN_HUMIDITY_RATIO => "Precool Design Humidity Ratio",
    CENTRAL_COOLING_DESIGN_SUPPLY_AIR_TEMPERATURE => "Central Cooling Design Supply Air Temperature",
    CENTRAL_HEATING_DESIGN_SUPPLY_AIR_TEMPERATURE => "Central Heating Design Supply Air Temperature",
    TYPE_OF_ZONE_SUM_TO_USE => "Type of Zone Sum to Use",
    ALL_OUTDOOR_AIR_IN_COOLING => "100% Outdoor Air in Cooling",
    ALL_OUTDOOR_AIR_IN_HEATING => "100% Outdoor Air in Heating",
    CENTRAL_COOLING_DESIGN_SUPPLY_AIR_HUMIDITY_RATIO => "Central Cooling Design Supply Air Humidity Ratio",
    CENTRAL_HEATING_DESIGN_SUPPLY_AIR_HUMIDITY_RATIO => "Central Heating Design Supply Air Humidity Ratio",
});

idf_fields!(plant_loop, "PlantLoop", {
    NAME => "Name",
    FLUID_TYPE => "Fluid Type",
    USER_DEFINED_FLUID_TYPE => "User Defined Fluid Type",
    OPERATION_SCHEME => "Plant Equipment Operation Scheme Name",
    LOOP_TEMPERATURE_SETPOINT_NODE => "Loop Temperature Setpoint Node Name",
    MAXIMUM_LOOP_TEMPERATURE => "Maximum Loop Temperature",
    MINIMUM_LOOP_TEMPERATURE => "Minimum Loop Temperature",
    MAXIMUM_LOOP_FLOW_RATE => "Maximum Loop Flow Rate",
    MINIMUM_LOOP_FLOW_RATE => "Minimum Loop Flow Rate",
    PLANT_LOOP_VOLUME => "Plant Loop Volume",
    PLANT_SIDE_INLET_NODE => "Plant Side Inlet Node Name",
    PLANT_SIDE_OUTLET_NODE => "Plant Side Outlet Node Name",
    PLANT_SIDE_BRANCH_LIST => "Plant Side Branch List Name",
    PLANT_SIDE_CONNECTOR_LIST => "Plant Side Connector List Name",
    DEMAND_SIDE_INLET_NODE => "Demand Side Inlet Node Name",
    DEMAND_SIDE_OUTLET_NODE => "Demand Side Outlet Node Name",
    DEMAND_SIDE_BRANCH_LIST => "Demand Side Branch List Name",
    DEMAND_SIDE_CONNECTOR_LIST => "Demand Side Connector List Name",
    LOAD_DISTRIBUTION_SCHEME => "Load Distribution Scheme",
    AVAILABILITY_MANAGER_LIST => "Availability Manager List Name",
    DEMAND_CALCULATION_SCHEME => "Plant Loop Demand Calculation Scheme",
    COMMON_PIPE_SIMULATION => "Common Pipe Simulation",
});

idf_fields!(sizing_plant, "Sizing:Plant", {
    PLANT_LOOP => "Plant or Condenser Loop Name",
    LOOP_TYPE => "Loop Type",
    DESIGN_LOOP_EXIT_TEMPERATURE => "Design Loop Exit Temperature",
    LOOP_DESIGN_TEMPERATURE_DIFFERENCE => "Loop Design Temperature Difference",
});

// Extensible: four fields per component after `PRESSURE_DROP_CURVE`.
idf_fields!(branch, "Branch", {
    NAME => "Name",
    PRESSURE_DROP_CURVE => "Pressure Drop Curve Name",
});

// Extensible: one branch name per field after `NAME`.
idf_fields!(branch_list, "BranchList", {
    NAME => "Name",
});

idf_fields!(outdoor_air_system, "AirLoopHVAC:OutdoorAirSystem", {
    NAME => "Name",
    CONTROLLER_LIST => "Controller List Name",
    EQUIPMENT_LIST => "Outdoor Air Equipment List Name",
});

// Extensible: object type and name per component after `NAME`.
idf_fields!(outdoor_air_equipment_list, "AirLoopHVAC:OutdoorAirSystem:EquipmentList", {
    NAME => "Name",
});

// Extensible: object type and name per controller after `NAME`.
idf_fields!(controller_list, "AirLoopHVAC:ControllerList", {
    NAME => "Name",
});

idf_fields!(outdoor_air_mixer, "OutdoorAir:Mixer", {
    NAME => "Name",
    MIXED_AIR_NODE => "Mixed Air Node Name",
    OUTDOOR_AIR_STREAM_NODE => "Outdoor Air Stream Node Name",
    RELIEF_AIR_STREAM_NODE => "Relief Air Stream Node Name",
    RETURN_AIR_STREAM_NODE => "Return Air Stream Node Name",
});

idf_fields!(controller_outdoor_air, "Controller:OutdoorAir", {
    NAME => "Name",
    RELIEF_AIR_OUTLET_NODE => "Relief Air Outlet Node Name",
    RETURN_AIR_NODE => "Return Air Node Name",
    MIXED_AIR_NODE => "Mixed Air Node Name",
    ACTUATOR_NODE => "Actuator Node Name",
    MINIMUM_OUTDOOR_AIR_FLOW_RATE => "Minimum Outdoor Air Flow Rate",
    MAXIMUM_OUTDOOR_AIR_FLOW_RATE => "Maximum Outdoor Air Flow Rate",
    ECONOMIZER_CONTROL_TYPE => "Economizer Control Type",
    ECONOMIZER_CONTROL_ACTION_TYPE => "Economizer Control Action Type",
    ECONOMIZER_MAXIMUM_LIMIT_DRY_BULB => "Economizer Maximum Limit Dry-Bulb Temperature",
    ECONOMIZER_MAXIMUM_LIMIT_ENTHALPY => "Economizer Maximum Limit Enthalpy",
    ECONOMIZER_MAXIMUM_LIMIT_DEWPOINT => "Economizer Maximum Limit Dewpoint Temperature",
    ELECTRONIC_ENTHALPY_LIMIT_CURVE => "Electronic Enthalpy Limit Curve Name",
    ECONOMIZER_MINIMUM_LIMIT_DRY_BULB => "Economizer Minimum Limit Dry-Bulb Temperature",
    LOCKOUT_TYPE => "Lockout Type",
    MINIMUM_LIMIT_TYPE => "Minimum Limit Type",
    MINIMUM_OUTDOOR_AIR_SCHEDULE => "Minimum Outdoor Air Schedule Name",
    MINIMUM_FRACTION_OF_OUTDOOR_AIR_SCHEDULE => "Minimum Fraction of Outdoor Air Schedule Name",
    MAXIMUM_FRACTION_OF_OUTDOOR_AIR_SCHEDULE => "Maximum Fraction of Outdoor Air Schedule Name",
});

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

const KNOWN: &[(&str, &[&str])] = &[
    (schedule_type_limits::OBJECT_TYPE, schedule_type_limits::LABELS),
    (schedule_constant::OBJECT_TYPE, schedule_constant::LABELS),
    (curve_cubic::OBJECT_TYPE, curve_cubic::LABELS),
    (curve_quadratic::OBJECT_TYPE, curve_quadratic::LABELS),
    (curve_biquadratic::OBJECT_TYPE, curve_biquadratic::LABELS),
    (setpoint_manager_scheduled::OBJECT_TYPE, setpoint_manager_scheduled::LABELS),
    (setpoint_manager_single_zone_reheat::OBJECT_TYPE, setpoint_manager_single_zone_reheat::LABELS),
    (setpoint_manager_mixed_air::OBJECT_TYPE, setpoint_manager_mixed_air::LABELS),
    (setpoint_manager_outdoor_air_reset::OBJECT_TYPE, setpoint_manager_outdoor_air_reset::LABELS),
    (
        setpoint_manager_follow_outdoor_air_temperature::OBJECT_TYPE,
        setpoint_manager_follow_outdoor_air_temperature::LABELS,
    ),
    (setpoint_manager_warmest::OBJECT_TYPE, setpoint_manager_warmest::LABELS),
    (
        setpoint_manager_warmest_temperature_flow::OBJECT_TYPE,
        setpoint_manager_warmest_temperature_flow::LABELS,
    ),
    (
        heat_exchanger_air_to_air_sensible_and_latent::OBJECT_TYPE,
        heat_exchanger_air_to_air_sensible_and_latent::LABELS,
    ),
    (fan_constant_volume::OBJECT_TYPE, fan_constant_volume::LABELS),
    (fan_variable_volume::OBJECT_TYPE, fan_variable_volume::LABELS),
    (coil_cooling_dx_single_speed::OBJECT_TYPE, coil_cooling_dx_single_speed::LABELS),
    (coil_heating_fuel::OBJECT_TYPE, coil_heating_fuel::LABELS),
    (coil_heating_electric::OBJECT_TYPE, coil_heating_electric::LABELS),
    (coil_heating_water::OBJECT_TYPE, coil_heating_water::LABELS),
    (coil_cooling_water::OBJECT_TYPE, coil_cooling_water::LABELS),
    (air_terminal_uncontrolled::OBJECT_TYPE, air_terminal_uncontrolled::LABELS),
    (air_terminal_vav_reheat::OBJECT_TYPE, air_terminal_vav_reheat::LABELS),
    (air_terminal_vav_no_reheat::OBJECT_TYPE, air_terminal_vav_no_reheat::LABELS),
    (
        zone_hvac_baseboard_convective_electric::OBJECT_TYPE,
        zone_hvac_baseboard_convective_electric::LABELS,
    ),
    (
        zone_hvac_baseboard_convective_water::OBJECT_TYPE,
        zone_hvac_baseboard_convective_water::LABELS,
    ),
    (zone_hvac_equipment_list::OBJECT_TYPE, zone_hvac_equipment_list::LABELS),
    (zone_hvac_equipment_connections::OBJECT_TYPE, zone_hvac_equipment_connections::LABELS),
    (pump_constant_speed::OBJECT_TYPE, pump_constant_speed::LABELS),
    (pump_variable_speed::OBJECT_TYPE, pump_variable_speed::LABELS),
    (boiler_hot_water::OBJECT_TYPE, boiler_hot_water::LABELS),
    (chiller_electric_eir::OBJECT_TYPE, chiller_electric_eir::LABELS),
    (cooling_tower_single_speed::OBJECT_TYPE, cooling_tower_single_speed::LABELS),
    (pipe_adiabatic::OBJECT_TYPE, pipe_adiabatic::LABELS),
    (zone::OBJECT_TYPE, zone::LABELS),
    (air_loop_hvac::OBJECT_TYPE, air_loop_hvac::LABELS),
    (sizing_system::OBJECT_TYPE, sizing_system::LABELS),
    (plant_loop::OBJECT_TYPE, plant_loop::LABELS),
    (sizing_plant::OBJECT_TYPE, sizing_plant::LABELS),
    (branch::OBJECT_TYPE, branch::LABELS),
    (branch_list::OBJECT_TYPE, branch_list::LABELS),
    (outdoor_air_system::OBJECT_TYPE, outdoor_air_system::LABELS),
    (outdoor_air_equipment_list::OBJECT_TYPE, outdoor_air_equipment_list::LABELS),
    (controller_list::OBJECT_TYPE, controller_list::LABELS),
    (outdoor_air_mixer::OBJECT_TYPE, outdoor_air_mixer::LABELS),
    (controller_outdoor_air::OBJECT_TYPE, controller_outdoor_air::LABELS),
];

const BRANCH_GROUP: [&str; 4] = ["Object Type", "Name", "Inlet Node Name", "Outlet Node Name"];
const EQUIPMENT_GROUP: [&str; 2] = ["Object Type", "Name"];
const ZONE_EQUIPMENT_GROUP: [&str; 4] =
    ["Object Type", "Name", "Cooling Sequence", "Heating or No-Load Sequence"];

/// Printable label of field `index` of `object_type`.
pub fn label(object_type: &str, index: usize) -> String {
    let labels = KNOWN
        .iter()
        .find(|(t, _)| t.eq_ignore_ascii_case(object_type))
        .map(|(_, l)| *l)
        .unwrap_or(&[]);
    if let Some(label) = labels.get(index) {
        return (*label).to_owned();
    }

    let extensible = |start: usize, group: &[&str]| {
        let offset = index - start;
        format!("Component {} {}", offset / group.len() + 1, group[offset % group.len()])
    };
    if object_type.eq_ignore_ascii_case(branch::OBJECT_TYPE) {
        extensible(labels.len(), &BRANCH_GROUP)
    } else if object_type.eq_ignore_ascii_case(outdoor_air_equipment_list::OBJECT_TYPE)
        || object_type.eq_ignore_ascii_case(controller_list::OBJECT_TYPE)
    {
        extensible(labels.len(), &EQUIPMENT_GROUP)
    } else if object_type.eq_ignore_ascii_case(zone_hvac_equipment_list::OBJECT_TYPE) {
        extensible(labels.len(), &ZONE_EQUIPMENT_GROUP)
    } else if object_type.eq_ignore_ascii_case(branch_list::OBJECT_TYPE) {
        format!("Branch {} Name", index)
    } else {
        format!("Field {}", index + 1)
    }
}
